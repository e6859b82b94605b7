//! Error types for the agent

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Agent error types
#[derive(Error, Debug)]
pub enum Error {
    /// Bootstrap failure; gates meaningful operation and is not recovered
    #[error("Bootstrap failed: {0}")]
    Bootstrap(String),

    /// Server launch failure; not recovered
    #[error("Launch failed: {0}")]
    Launch(String),

    /// Source checkout update failure; recovered by the caller
    #[error("Source update failed: {0}")]
    Source(String),

    /// Model fetch failure; recovered by the caller
    #[error("Model fetch failed: {0}")]
    Fetch(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Utility error
    #[error(transparent)]
    Utils(#[from] cirrus_utils::Error),

    /// Core error
    #[error(transparent)]
    Core(#[from] cirrus_core::Error),

    /// Generic error
    #[error("{0}")]
    Generic(String),
}

impl Error {
    /// Create a bootstrap error
    pub fn bootstrap(msg: impl Into<String>) -> Self {
        Self::Bootstrap(msg.into())
    }

    /// Create a launch error
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }

    /// Create a source update error
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }
}
