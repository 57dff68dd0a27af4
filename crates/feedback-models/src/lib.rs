//! Core data models for the GPT Feedback plugin.
//!
//! This crate provides the fundamental data types shared across the
//! plugin: orders and their reviews, inbound host events, the plugin
//! configuration, and the per-order review state that makes reply
//! submission idempotent.

pub mod config;
pub mod event;
pub mod fingerprint;
pub mod meta;
pub mod order;
pub mod state;

// Re-export main types
pub use config::{PluginConfig, PromptFields, DEFAULT_MODEL};
pub use event::{EventKind, FeedbackEvent};
pub use fingerprint::review_fingerprint;
pub use meta::{PLUGIN_DESCRIPTION, PLUGIN_NAME, PLUGIN_UUID, PLUGIN_VERSION};
pub use order::{Order, OrderId, Review};
pub use state::ReviewState;
