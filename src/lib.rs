//! Event-driven kinematics for hard disks confined to a circular
//! container: balls move in straight lines at constant velocity between
//! perfectly elastic collisions, and the engine jumps directly from one
//! collision to the next rather than stepping a fixed time grid.
//!
//! Rendering, CLI plumbing, and persistence are deliberately kept out of
//! this crate; see the `balls` binary for a thin driver built on top of
//! the interfaces here.

pub mod ball;
pub mod body;
pub mod body_store;
pub mod config;
pub mod container;
pub mod engine;
pub mod error;
pub mod event;
pub mod kinematics;
pub mod logging;
pub mod measurement;
pub mod queue;

pub use ball::Ball;
pub use body::BodyId;
pub use config::{load_config, CliArgs, EngineConfig};
pub use container::Container;
pub use engine::{CollisionReport, Engine};
pub use error::{ConfigError, EngineError};
pub use measurement::Histogram;
