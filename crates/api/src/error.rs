//! Server Error Types

use storage::StorageError;
use thiserror::Error;

/// Errors that stop the server from starting or running
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A configuration value was loaded but is not usable
    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    /// Sensor store failed to open
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Socket bind or serve failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tracing subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Prometheus recorder could not be installed
    #[error("Metrics setup failed: {0}")]
    Metrics(String),
}
