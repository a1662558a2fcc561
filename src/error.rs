use thiserror::Error;

/// Failure modes of the simulation core.
///
/// `NumericalRegression` is never returned to a caller: the scheduler
/// constructs it purely to get a descriptive message, then panics with
/// it, because a negative time delta means a bug in the scheduler
/// itself rather than a condition a caller could meaningfully recover
/// from. Everything else is a plain `Result` the caller is expected to
/// handle.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("engine used before initialize() was called")]
    NotInitialized,

    #[error("collision resolved at t={event_time} but global_time={global_time}")]
    NumericalRegression { event_time: f64, global_time: f64 },

    #[error("no pending collision events remain")]
    NoPendingEvents,
}

/// Failure modes of loading an [`crate::config::EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file as TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}
