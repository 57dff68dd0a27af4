//! Feedback reply synchronization.
//!
//! Listens to marketplace feedback events and keeps review replies in
//! line with current review content and settings: a new or edited
//! review on an allowed rating gets a generated reply, a deleted or
//! disqualified review gets its reply retracted. All remote access goes
//! through the collaborator traits in [`host`], so the synchronizer can
//! be exercised end to end against in-memory fakes.

pub mod error;
pub mod host;
pub mod prompt;
pub mod synchronizer;

// Re-export main types
pub use error::{Result, SyncError};
pub use host::{HostError, OperatorNotifier, OrderStore, PluginHost, ReviewChannel};
pub use prompt::{build_info_block, build_prompt};
pub use synchronizer::{FeedbackSynchronizer, SkipReason, SyncOutcome};
