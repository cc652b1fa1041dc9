//! Error types for collectors.

use thiserror::Error;

/// Errors that can occur when fetching documents from the Storm UI.
#[derive(Debug, Clone, Error)]
pub enum CollectError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The UI answered with a non-2xx status.
    #[error("Storm UI returned status {0}")]
    Status(u16),

    /// The UI answered with something other than JSON.
    #[error("Invalid response format: {0}")]
    ContentType(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for CollectError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CollectError::Timeout
        } else if err.is_connect() {
            CollectError::Connection(err.to_string())
        } else {
            CollectError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CollectError {
    fn from(err: serde_json::Error) -> Self {
        CollectError::Parse(err.to_string())
    }
}
