//! Error types for wv-fetch.

use thiserror::Error;

/// Result type alias for wv-fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that can occur while talking to the word API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport or status-code failure from the HTTP layer.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered 200 but the body did not have the expected shape.
    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),
}

impl FetchError {
    /// Create an unexpected-response error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse(message.into())
    }
}
