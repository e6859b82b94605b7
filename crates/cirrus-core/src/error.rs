//! Error types for cirrus-core

use thiserror::Error;

/// Result type alias for cirrus-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Error, Debug)]
pub enum Error {
    /// Settings file not found
    #[error("Settings file not found: {0}")]
    FileNotFound(String),

    /// Invalid settings
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Config write error
    #[error("Config write failed: {0}")]
    ConfigWrite(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error
    #[error("{0}")]
    Generic(String),
}

impl Error {
    /// Create an invalid-settings error
    pub fn invalid_settings(msg: impl Into<String>) -> Self {
        Self::InvalidSettings(msg.into())
    }

    /// Create a config write error
    pub fn config_write(msg: impl Into<String>) -> Self {
        Self::ConfigWrite(msg.into())
    }

    /// Create a generic error
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }
}
