//! Configuration loading errors.

use thiserror::Error;

/// Error raised while loading or validating a [`NavConfig`](super::NavConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML was malformed or had wrong types
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is outside its physical or logical range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
