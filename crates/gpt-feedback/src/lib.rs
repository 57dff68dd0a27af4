//! GPT Feedback - automatic AI-generated replies to marketplace reviews.
//!
//! The plugin listens for feedback events from a marketplace-bot host,
//! generates a reply with a chat-completions API, and submits it to the
//! order's review. Review content is fingerprinted so repeated or
//! re-delivered events never double-post; deleted or emptied reviews
//! retract the tracked reply. Settings (on/off switch, allowed star
//! ratings, prompt fields, API key) live in a persisted store edited
//! through the Telegram bot in the `feedback-telegram` crate.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use gpt_feedback::{Plugin, SyncOutcome};
//! # use gpt_feedback::{FeedbackEvent, HostError, OperatorNotifier, Order, OrderId,
//! #                    OrderStore, ReviewChannel};
//! # use async_trait::async_trait;
//! # struct Host;
//! # #[async_trait] impl OrderStore for Host {
//! #     async fn get_order(&self, _: &OrderId) -> Result<Option<Order>, HostError> { Ok(None) }
//! # }
//! # #[async_trait] impl ReviewChannel for Host {
//! #     async fn submit_reply(&self, _: &OrderId, _: u8, _: &str) -> Result<(), HostError> { Ok(()) }
//! #     async fn delete_reply(&self, _: &OrderId) -> Result<(), HostError> { Ok(()) }
//! # }
//! # #[async_trait] impl OperatorNotifier for Host {
//! #     async fn notify(&self, _: &str) {}
//! # }
//!
//! # async fn run(event: FeedbackEvent) -> Result<(), Box<dyn std::error::Error>> {
//! let host = Arc::new(Host);
//! let plugin = Plugin::builder(host.clone(), host.clone(), host).build()?;
//!
//! match plugin.handle_event(&event).await {
//!     SyncOutcome::ReplySubmitted => println!("replied"),
//!     outcome => println!("{outcome:?}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod plugin;

pub use error::{PluginError, Result};
pub use plugin::{Plugin, PluginBuilder};

// Plugin descriptor
pub use feedback_models::{PLUGIN_DESCRIPTION, PLUGIN_NAME, PLUGIN_UUID, PLUGIN_VERSION};

// Domain types the host exchanges with the plugin
pub use feedback_models::{
    EventKind, FeedbackEvent, Order, OrderId, PluginConfig, PromptFields, Review,
};

// Collaborator traits and outcomes
pub use feedback_completion::{
    CompletionBackend, CompletionClient, CompletionError, ReplyGenerator, RetryPolicy,
};
pub use feedback_sync::{
    HostError, OperatorNotifier, OrderStore, PluginHost, ReviewChannel, SkipReason, SyncOutcome,
};
