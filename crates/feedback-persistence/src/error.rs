//! Error types for the persistence layer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing plugin state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON serialization or parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A store lock was poisoned by a panicking thread.
    #[error("Store lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
