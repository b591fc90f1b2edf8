use thiserror::Error;

/// Contract violations when building or mutating an [`crate::intent::Intent`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentError {
    #[error("Invalid priority {priority}: must be in [0, 100]")]
    InvalidPriority { priority: u32 },
}

/// Inconsistent pass generator configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Candidate pool must hold at least one pass")]
    EmptyPool,

    #[error("Cannot keep {keep} passes after pruning a pool of {pool}")]
    KeepExceedsPool { keep: usize, pool: usize },

    #[error("Invalid range for {name}: [{min}, {max}]")]
    InvalidRange { name: &'static str, min: f64, max: f64 },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: f64 },
}

/// Failures constructing a [`crate::passing::PassGenerator`]
#[derive(Error, Debug)]
pub enum PassGeneratorError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to spawn pass generation thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),
}

impl ConfigError {
    pub fn range(name: &'static str, min: f64, max: f64) -> Self {
        ConfigError::InvalidRange { name, min, max }
    }
}
