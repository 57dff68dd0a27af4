//! Synchronizer error types.

use thiserror::Error;

/// Failures that abort a synchronization pass.
///
/// Collaborator failures (order fetch, reply submission) are handled
/// inline and never surface here; only storage faults abort the pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading or writing plugin storage failed.
    #[error(transparent)]
    Persistence(#[from] feedback_persistence::PersistenceError),
}

/// Result alias for synchronizer operations.
pub type Result<T> = std::result::Result<T, SyncError>;
