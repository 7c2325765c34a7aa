use std::path::PathBuf;

/// Errors surfaced by the targeting agent to its caller.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("invalid notification: {0}")]
    InvalidNotification(String),

    #[error("no untried cell left on a {size}x{size} board")]
    ExhaustedBoard { size: usize },
}

/// Errors that can occur while reading or writing the reinforcement store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read value store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse value store {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("value store is {found}x{found}, expected {expected}x{expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during self-play training.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("could not place the fleet on a {size}x{size} board")]
    FleetPlacement { size: usize },

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
