//! Domain error types

use thiserror::Error;

/// Configuration could not be loaded, stored or validated
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Malformed config: {0}")]
    Malformed(String),

    #[error("Cannot write {path}: {message}")]
    Unwritable { path: String, message: String },

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
