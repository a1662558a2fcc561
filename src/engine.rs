//! The scheduler: drives the body store forward by jumping from one
//! collision to the next, rescheduling only the bodies a collision
//! actually touched.

use log::{debug, info, trace, warn};

use crate::ball::Ball;
use crate::body::BodyId;
use crate::body_store::BodyStore;
use crate::error::EngineError;
use crate::event::{EventKey, Fingerprint};
use crate::kinematics::{
    resolve_ball_container, resolve_ball_ball, time_to_ball_collision, time_to_container_collision,
};
use crate::measurement::Histogram;
use crate::queue::EventQueue;

/// Tolerance used when validating initial ball placement against the
/// no-overlap and inside-container invariants.
const GEOMETRY_EPSILON: f64 = 1e-9;

/// Outcome of a single resolved collision, as returned by
/// [`Engine::step_to_next_collision`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionReport {
    pub t_before: f64,
    pub t_after: f64,
    pub i: usize,
    pub other: BodyId,
}

pub struct Engine {
    store: BodyStore,
    queue: EventQueue,
    global_time: f64,
    next_event: Option<(EventKey, f64)>,
    initialized: bool,
}

impl Engine {
    pub fn new(container_radius: f64) -> Self {
        Engine {
            store: BodyStore::new(container_radius),
            queue: EventQueue::new(),
            global_time: 0.0,
            next_event: None,
            initialized: false,
        }
    }

    pub fn add_ball(&mut self, pos: (f64, f64), vel: (f64, f64), radius: f64, mass: f64) {
        self.store.push(Ball::new(pos, vel, radius, mass));
    }

    /// Validate placement, build the event queue from every candidate
    /// pair and every ball-container candidate, and pop the first valid
    /// event. Must be called exactly once before stepping.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        self.validate_placement()?;

        let n = self.store.len();
        for i in 0..n {
            for j in (i + 1)..n {
                self.try_push_ball_ball(i, j);
            }
            self.try_push_ball_container(i);
        }

        self.next_event = self.pop_valid();
        self.initialized = true;
        info!(
            "initialized engine with {} balls, {} queued events",
            n,
            self.queue.len()
        );
        Ok(())
    }

    fn validate_placement(&self) -> Result<(), EngineError> {
        let balls = self.store.balls();
        let container_radius = self.store.container().radius;

        for (i, ball) in balls.iter().enumerate() {
            if ball.radius <= 0.0 {
                return Err(EngineError::InvalidConfiguration(format!(
                    "ball {i} has non-positive radius {}",
                    ball.radius
                )));
            }
            if ball.mass <= 0.0 {
                return Err(EngineError::InvalidConfiguration(format!(
                    "ball {i} has non-positive mass {}",
                    ball.mass
                )));
            }
            if ball.position.norm() + ball.radius > container_radius + GEOMETRY_EPSILON {
                return Err(EngineError::InvalidConfiguration(format!(
                    "ball {i} escapes the container (|p|+r={}, R={container_radius})",
                    ball.position.norm() + ball.radius
                )));
            }
        }

        for i in 0..balls.len() {
            for j in (i + 1)..balls.len() {
                let distance = (balls[j].position - balls[i].position).norm();
                let min_distance = balls[i].radius + balls[j].radius;
                if distance + GEOMETRY_EPSILON < min_distance {
                    return Err(EngineError::InvalidConfiguration(format!(
                        "balls {i} and {j} overlap (distance={distance}, r_i+r_j={min_distance})"
                    )));
                }
            }
        }
        Ok(())
    }

    fn try_push_ball_ball(&mut self, i: usize, j: usize) {
        let a = self.store.ball(i);
        let b = self.store.ball(j);
        if let Some(dt) = time_to_ball_collision(a, b) {
            let fingerprint = Fingerprint::of_ball_ball(a, b);
            self.queue
                .push(self.global_time + dt, i, BodyId::Ball(j), fingerprint);
        }
    }

    fn try_push_ball_container(&mut self, i: usize) {
        let ball = self.store.ball(i);
        if let Some(dt) = time_to_container_collision(ball, self.store.container()) {
            let fingerprint = Fingerprint::of_ball_container(ball);
            self.queue
                .push(self.global_time + dt, i, BodyId::Container, fingerprint);
        }
    }

    /// Recompute candidates for every pair/ball touching `i` (and the
    /// container), discarding nothing already queued: stale entries are
    /// weeded out lazily at pop time instead.
    fn reschedule(&mut self, i: usize) {
        let n = self.store.len();
        for k in 0..n {
            if k != i {
                let (lo, hi) = if i < k { (i, k) } else { (k, i) };
                self.try_push_ball_ball(lo, hi);
            }
        }
        self.try_push_ball_container(i);
    }

    /// Pop events until one whose fingerprint still matches current
    /// state is found, or the queue is exhausted.
    fn pop_valid(&mut self) -> Option<(EventKey, f64)> {
        while let Some((key, t)) = self.queue.pop() {
            let current = match key.other {
                BodyId::Ball(j) => Fingerprint::of_ball_ball(self.store.ball(key.i), self.store.ball(j)),
                BodyId::Container => Fingerprint::of_ball_container(self.store.ball(key.i)),
            };
            if current == key.fingerprint {
                return Some((key, t));
            }
            trace!(
                "discarding stale event for ({}, {:?}) predicted at {t}",
                key.i, key.other
            );
        }
        None
    }

    pub fn step_to_next_collision(&mut self) -> Result<CollisionReport, EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        let (key, t) = self.next_event.take().ok_or(EngineError::NoPendingEvents)?;

        let delta_t = t - self.global_time;
        if delta_t < 0.0 {
            let err = EngineError::NumericalRegression {
                event_time: t,
                global_time: self.global_time,
            };
            panic!("{err}");
        }

        let t_before = self.global_time;
        self.store.step_all(delta_t);
        self.global_time = t;

        match key.other {
            BodyId::Ball(j) => {
                let (a, b) = self.store.ball_pair_mut(key.i, j);
                resolve_ball_ball(a, b);
                debug!("resolved ball-ball collision ({}, {j}) at t={t}", key.i);
                self.reschedule(key.i);
                self.reschedule(j);
            }
            BodyId::Container => {
                let container_radius = self.store.container().radius;
                let ball = self.store.ball_mut(key.i);
                if ball.position.norm() - container_radius > 1e-6 {
                    warn!(
                        "ball {} reflecting off container with |p|={} exceeding R={container_radius}",
                        key.i,
                        ball.position.norm()
                    );
                }
                resolve_ball_container(ball);
                debug!("resolved ball-container collision ({}) at t={t}", key.i);
                self.reschedule(key.i);
            }
        }

        self.next_event = self.pop_valid();

        Ok(CollisionReport {
            t_before,
            t_after: t,
            i: key.i,
            other: key.other,
        })
    }

    /// Process every event within `[global_time, global_time + delta]` in
    /// order, then free-flight through whatever remains of the step.
    pub fn advance_by(&mut self, delta: f64) -> Result<(), EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        assert!(delta >= 0.0, "advance_by requires a non-negative delta");

        let target = self.global_time + delta;
        while let Some((_, t)) = self.next_event {
            if t > target {
                break;
            }
            self.step_to_next_collision()?;
        }

        let remainder = target - self.global_time;
        self.store.step_all(remainder);
        self.global_time = target;
        Ok(())
    }

    pub fn global_time(&self) -> f64 {
        self.global_time
    }

    pub fn balls(&self) -> &[Ball] {
        self.store.balls()
    }

    pub fn container_radius(&self) -> f64 {
        self.store.container().radius
    }

    /// Advance for `count` collisions, bucketing inter-collision gaps
    /// into an equal-width histogram over `[t_min, t_max]`.
    pub fn collision_times(
        &mut self,
        count: usize,
        t_min: f64,
        t_max: f64,
        bins: usize,
    ) -> Result<Histogram, EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        let mut histogram = Histogram::new(t_min, t_max, bins);
        let mut previous = self.global_time;
        for _ in 0..count {
            let report = self.step_to_next_collision()?;
            histogram.record(t_min, t_max, report.t_after - previous);
            previous = report.t_after;
        }
        Ok(histogram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_ball_head_on() -> Engine {
        let mut engine = Engine::new(1.0);
        engine.add_ball((-0.5, 0.0), (1.0, 0.0), 0.05, 1.0);
        engine.add_ball((0.5, 0.0), (-1.0, 0.0), 0.05, 1.0);
        engine.initialize().unwrap();
        engine
    }

    #[test]
    fn two_ball_head_on_resolves_at_expected_time() {
        let mut engine = two_ball_head_on();
        let report = engine.step_to_next_collision().unwrap();
        assert!((report.t_after - 0.45).abs() < 1e-9);
        assert_eq!(report.i, 0);
        assert_eq!(report.other, BodyId::Ball(1));
        assert!((engine.balls()[0].velocity.x - (-1.0)).abs() < 1e-9);
        assert!((engine.balls()[1].velocity.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn two_ball_head_on_then_both_hit_container() {
        // After the velocity swap at t=0.45, ball 0 sits at x=-0.05
        // moving at -1 and must cover 0.9 to reach the boundary at
        // x=-0.95, landing at t=0.45+0.9=1.35.
        let mut engine = two_ball_head_on();
        engine.step_to_next_collision().unwrap();
        let next = engine.step_to_next_collision().unwrap();
        assert!((next.t_after - 1.35).abs() < 1e-9);
    }

    #[test]
    fn single_ball_containment_sequence() {
        let mut engine = Engine::new(1.0);
        engine.add_ball((0.0, 0.0), (1.0, 0.0), 0.1, 1.0);
        engine.initialize().unwrap();

        let first = engine.step_to_next_collision().unwrap();
        assert!((first.t_after - 0.9).abs() < 1e-9);
        assert!((engine.balls()[0].velocity.x - (-1.0)).abs() < 1e-9);

        let second = engine.step_to_next_collision().unwrap();
        assert!((second.t_after - 2.7).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_paths_first_events_are_container_only() {
        let mut engine = Engine::new(2.0);
        engine.add_ball((0.0, 0.0), (1.0, 0.0), 0.05, 1.0);
        engine.add_ball((0.5, 0.5), (0.0, 1.0), 0.05, 1.0);
        engine.initialize().unwrap();

        for _ in 0..2 {
            let report = engine.step_to_next_collision().unwrap();
            assert_eq!(report.other, BodyId::Container);
        }
    }

    #[test]
    fn stale_event_between_three_collinear_balls_is_rejected() {
        // A approaches B; B is initially at rest near C, with a stale
        // B-C candidate queued from initialize() that must be discarded
        // once A's collision with B changes B's velocity.
        let mut engine = Engine::new(5.0);
        engine.add_ball((-1.0, 0.0), (1.0, 0.0), 0.1, 1.0);
        engine.add_ball((0.0, 0.0), (0.0, 0.0), 0.1, 1.0);
        engine.add_ball((1.0, 0.0), (0.0, 0.0), 0.1, 1.0);
        engine.initialize().unwrap();

        let first = engine.step_to_next_collision().unwrap();
        assert_eq!((first.i, first.other), (0, BodyId::Ball(1)));

        let second = engine.step_to_next_collision().unwrap();
        assert_eq!((second.i, second.other), (1, BodyId::Ball(2)));
    }

    #[test]
    fn stepping_before_initialize_is_reported() {
        let mut engine = Engine::new(1.0);
        engine.add_ball((0.0, 0.0), (1.0, 0.0), 0.1, 1.0);
        assert!(matches!(
            engine.step_to_next_collision(),
            Err(EngineError::NotInitialized)
        ));
    }

    #[test]
    fn overlapping_balls_are_rejected_at_initialize() {
        let mut engine = Engine::new(1.0);
        engine.add_ball((0.0, 0.0), (0.0, 0.0), 0.2, 1.0);
        engine.add_ball((0.1, 0.0), (0.0, 0.0), 0.2, 1.0);
        assert!(matches!(
            engine.initialize(),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn ball_outside_container_is_rejected_at_initialize() {
        let mut engine = Engine::new(1.0);
        engine.add_ball((2.0, 0.0), (0.0, 0.0), 0.1, 1.0);
        assert!(matches!(
            engine.initialize(),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn advance_by_processes_all_events_within_the_step() {
        let mut engine = two_ball_head_on();
        // One step spanning the ball-ball collision at t=0.45; the next
        // container collisions at t=1.35 fall outside this window, so
        // velocities reflect exactly one resolved collision.
        engine.advance_by(1.0).unwrap();
        assert!((engine.global_time() - 1.0).abs() < 1e-9);
        assert!((engine.balls()[0].velocity.x - (-1.0)).abs() < 1e-9);
        assert!((engine.balls()[0].position.x - (-0.6)).abs() < 1e-9);
    }

    #[test]
    fn advance_by_free_flights_when_no_event_is_within_range() {
        let mut engine = two_ball_head_on();
        engine.advance_by(0.1).unwrap();
        assert!((engine.global_time() - 0.1).abs() < 1e-9);
        assert!((engine.balls()[0].position.x - (-0.4)).abs() < 1e-9);
    }

    #[test]
    fn free_flight_is_additive() {
        let mut a = two_ball_head_on();
        let mut b = two_ball_head_on();
        a.advance_by(0.2).unwrap();
        a.advance_by(0.1).unwrap();
        b.advance_by(0.3).unwrap();
        assert!((a.balls()[0].position.x - b.balls()[0].position.x).abs() < 1e-9);
    }

    #[test]
    fn energy_and_momentum_are_conserved_across_random_collisions() {
        use rand::{Rng, SeedableRng};
        use rand_pcg::Pcg64;

        let mut rng = Pcg64::seed_from_u64(7);
        let mut engine = Engine::new(1.0);
        let n = 12;
        let mut placed = 0;
        while placed < n {
            let radius = 0.03;
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let dist = rng.gen_range(0.0..(1.0 - radius));
            let pos = (dist * angle.cos(), dist * angle.sin());
            let speed = rng.gen_range(0.1..2.0);
            let v_angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let vel = (speed * v_angle.cos(), speed * v_angle.sin());

            let overlaps = engine
                .balls()
                .iter()
                .any(|b| (b.position - nalgebra::Vector2::new(pos.0, pos.1)).norm() < b.radius + radius);
            if overlaps {
                continue;
            }
            engine.add_ball(pos, vel, radius, 1.0);
            placed += 1;
        }
        engine.initialize().unwrap();

        let initial_energy: f64 = engine.balls().iter().map(|b| b.kinetic_energy()).sum();

        for _ in 0..1000 {
            engine.step_to_next_collision().unwrap();
        }

        let final_energy: f64 = engine.balls().iter().map(|b| b.kinetic_energy()).sum();
        let relative_drift = (final_energy - initial_energy).abs() / initial_energy;
        assert!(relative_drift < 1e-6, "relative drift was {relative_drift}");
    }
}
