use balls::config::Command;
use balls::{load_config, logging, CliArgs, Engine};
use clap::Parser;
use log::info;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

fn build_engine(config: &balls::EngineConfig) -> Engine {
    let mut engine = Engine::new(config.radius);
    let mut rng = Pcg64::seed_from_u64(config.seed);

    let mut placed = 0;
    let mut placed_balls: Vec<((f64, f64), f64)> = Vec::with_capacity(config.ball_count);
    while placed < config.ball_count {
        let radius = rng.gen_range(config.min_ball_radius..=config.max_ball_radius);
        let max_dist = config.radius - radius;
        if max_dist <= 0.0 {
            break;
        }
        let dist = rng.gen_range(0.0..max_dist);
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let pos = (dist * angle.cos(), dist * angle.sin());

        let overlaps = placed_balls.iter().any(|(other_pos, other_radius)| {
            let dx = other_pos.0 - pos.0;
            let dy = other_pos.1 - pos.1;
            (dx * dx + dy * dy).sqrt() <= other_radius + radius
        });
        if overlaps {
            continue;
        }

        let speed = rng.gen_range(config.min_speed..=config.max_speed);
        let v_angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let vel = (speed * v_angle.cos(), speed * v_angle.sin());

        engine.add_ball(pos, vel, radius, 1.0);
        placed_balls.push((pos, radius));
        placed += 1;
    }

    engine
}

fn main() {
    let args = CliArgs::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = logging::init_logging(logging::parse_level(&config.log_level)) {
        eprintln!("failed to initialize logging: {err}");
        std::process::exit(1);
    }

    let mut engine = build_engine(&config);
    if let Err(err) = engine.initialize() {
        eprintln!("failed to initialize engine: {err}");
        std::process::exit(1);
    }
    info!(
        "engine ready: {} balls in a container of radius {}",
        engine.balls().len(),
        engine.container_radius()
    );

    match args.command {
        Command::Measure {
            count,
            t_min,
            t_max,
            bins,
        } => match engine.collision_times(count, t_min, t_max, bins) {
            Ok(histogram) => match serde_json::to_string_pretty(&histogram) {
                Ok(json) => println!("{json}"),
                Err(err) => eprintln!("failed to serialize histogram: {err}"),
            },
            Err(err) => eprintln!("measurement failed: {err}"),
        },
        Command::Run { ticks } => {
            for tick in 0..ticks {
                if let Err(err) = engine.advance_by(config.step) {
                    eprintln!("advance failed: {err}");
                    std::process::exit(1);
                }
                info!(
                    "tick {tick}: t={:.4}, {} balls",
                    engine.global_time(),
                    engine.balls().len()
                );
            }
        }
    }
}
