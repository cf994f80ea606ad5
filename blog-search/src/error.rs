//! Error types for the search module

use thiserror::Error;

/// Errors that can occur while talking to a search backend
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Failed to parse API response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Backend selected without its credentials
    #[error("Backend not configured: {0}")]
    NotConfigured(String),
}
