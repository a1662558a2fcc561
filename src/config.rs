//! Layered configuration: built-in defaults, an optional TOML file,
//! `BALLS_*` environment variables, then CLI flags, each overlaying the
//! last.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameters needed to stand up an [`crate::engine::Engine`] without
/// writing code: container geometry, the procedurally-generated ball
/// field, the interactive step size, and log verbosity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub radius: f64,
    pub ball_count: usize,
    pub min_ball_radius: f64,
    pub max_ball_radius: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub step: f64,
    pub seed: u64,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            radius: 1.0,
            ball_count: 50,
            min_ball_radius: 0.01,
            max_ball_radius: 0.03,
            min_speed: 0.1,
            max_speed: 2.0,
            step: 1e-2,
            seed: 0,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.radius <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if self.ball_count == 0 {
            return Err(ConfigError::InvalidValue(
                "ball_count must be at least 1".to_string(),
            ));
        }
        if self.step <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if self.min_ball_radius <= 0.0 || self.min_ball_radius > self.max_ball_radius {
            return Err(ConfigError::InvalidValue(
                "min_ball_radius must be positive and no greater than max_ball_radius".to_string(),
            ));
        }
        Ok(())
    }
}

/// Command-line flags, parsed with `clap`'s derive API. Any flag left
/// unset falls through to the environment/file/default layers below it.
#[derive(Parser, Debug, Default)]
#[command(name = "balls", about = "Event-driven hard-disk collision simulator")]
pub struct CliArgs {
    /// Path to a TOML config file.
    #[arg(long, env = "BALLS_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "BALLS_RADIUS")]
    pub radius: Option<f64>,

    #[arg(long, env = "BALLS_BALL_COUNT")]
    pub ball_count: Option<usize>,

    #[arg(long, env = "BALLS_STEP")]
    pub step: Option<f64>,

    #[arg(long, env = "BALLS_SEED")]
    pub seed: Option<u64>,

    #[arg(long, env = "BALLS_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// What the CLI should do once the engine is built.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run `count` collisions and print a histogram of inter-collision gaps.
    Measure {
        #[arg(long, default_value_t = 1000)]
        count: usize,
        #[arg(long, default_value_t = 0.0)]
        t_min: f64,
        #[arg(long, default_value_t = 1.0)]
        t_max: f64,
        #[arg(long, default_value_t = 50)]
        bins: usize,
    },
    /// Advance the simulation through a number of interactive-style
    /// ticks, logging progress as it goes.
    Run {
        #[arg(long, default_value_t = 100)]
        ticks: usize,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Measure {
            count: 1000,
            t_min: 0.0,
            t_max: 1.0,
            bins: 50,
        }
    }
}

/// Load an [`EngineConfig`], overlaying defaults with an optional TOML
/// file, then `BALLS_*` environment variables (handled by `clap`'s
/// `env` attribute above), then explicit CLI flags.
pub fn load_config(args: &CliArgs) -> Result<EngineConfig, ConfigError> {
    let mut config = EngineConfig::default();

    if let Some(path) = &args.config {
        overlay_from_file(&mut config, path)?;
    }

    if let Some(radius) = args.radius {
        config.radius = radius;
    }
    if let Some(ball_count) = args.ball_count {
        config.ball_count = ball_count;
    }
    if let Some(step) = args.step {
        config.step = step;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn overlay_from_file(config: &mut EngineConfig, path: &Path) -> Result<(), ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let from_file: EngineConfig = toml::from_str(&text)?;
    *config = from_file;
    Ok(())
}
