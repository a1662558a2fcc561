use balls::Engine;

/// A single ball bouncing radially between two diametrically opposite
/// points of the container has a fixed period, so the inter-collision
/// histogram should show essentially all of its mass concentrated in
/// the bin straddling that period.
#[test]
fn single_ball_histogram_spikes_at_the_known_period() {
    let radius = 1.0;
    let ball_radius = 0.05;
    let speed = 1.0;
    let period = 2.0 * (radius - ball_radius) / speed;

    let mut engine = Engine::new(radius);
    engine.add_ball((0.0, 0.0), (speed, 0.0), ball_radius, 1.0);
    engine.initialize().unwrap();
    // The very first collision is only a half-period away (the ball
    // starts at the center rather than mid-bounce); consume it so every
    // gap the histogram records below is a full period.
    engine.step_to_next_collision().unwrap();

    let histogram = engine.collision_times(1000, 0.0, period * 2.0, 50).unwrap();

    let spike_bin = histogram
        .centers
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (**a - period).abs().partial_cmp(&(**b - period).abs()).unwrap())
        .map(|(i, _)| i)
        .unwrap();

    let total: u64 = histogram.counts.iter().sum();
    assert!(total > 0);
    assert_eq!(
        histogram.counts[spike_bin], total,
        "expected every recorded gap to land in the bin around the period {period}"
    );
}

#[test]
fn engine_rejects_stepping_without_initialization() {
    let mut engine = Engine::new(1.0);
    engine.add_ball((0.0, 0.0), (1.0, 0.0), 0.1, 1.0);
    assert!(engine.step_to_next_collision().is_err());
    assert!(engine.collision_times(1, 0.0, 1.0, 10).is_err());
}
