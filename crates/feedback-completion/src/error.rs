//! Error types for completion requests.

use thiserror::Error;

/// Errors that can occur while requesting a completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Transport-level failure (connect, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Completion API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Result type for completion operations.
pub type Result<T> = std::result::Result<T, CompletionError>;
