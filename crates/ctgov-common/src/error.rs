//! Error types for ctgov

use thiserror::Error;

/// Result type alias for ctgov operations
pub type Result<T> = std::result::Result<T, CtgovError>;

/// Main error type for ctgov
#[derive(Error, Debug)]
pub enum CtgovError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Discovery error: {0}")]
    Discovery(String),
}

impl CtgovError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }
}
