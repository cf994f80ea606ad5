//! Error types for the blog pipeline

use thiserror::Error;

/// Workspace-wide error type
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BlogError {
    pub fn api(msg: impl Into<String>) -> Self {
        BlogError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        BlogError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        BlogError::Parse(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        BlogError::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        BlogError::Config(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        BlogError::Storage(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        BlogError::Internal(msg.into())
    }
}

/// Result type alias for pipeline operations
pub type BlogResult<T> = Result<T, BlogError>;
