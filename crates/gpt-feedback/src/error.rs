//! Error types for plugin construction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while wiring the plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The storage directory could not be created.
    #[error("failed to create storage directory {path}")]
    StorageDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted store could not be opened.
    #[error(transparent)]
    Persistence(#[from] feedback_persistence::PersistenceError),

    /// The bundled completion client could not be constructed.
    #[error(transparent)]
    Completion(#[from] feedback_completion::CompletionError),
}

/// Result type for plugin construction.
pub type Result<T> = std::result::Result<T, PluginError>;
