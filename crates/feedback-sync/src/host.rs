//! Host collaborator interfaces.
//!
//! The synchronizer never talks to the marketplace, Telegram, or the
//! host's plugin manager directly; it goes through these traits. The
//! host glue implements them over its own APIs, and tests substitute
//! recording fakes.

use std::fmt;

use async_trait::async_trait;

use feedback_models::{Order, OrderId};

/// Opaque failure reported by a host collaborator.
///
/// The synchronizer only logs and relays these, so a message is all
/// that is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError(String);

impl HostError {
    /// Wraps a collaborator failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for HostError {}

impl From<String> for HostError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// Access to marketplace orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Fetches an order by id; `Ok(None)` when the order is unknown.
    async fn get_order(&self, order_id: &OrderId) -> Result<Option<Order>, HostError>;
}

/// Posting and removing seller replies on reviews.
#[async_trait]
pub trait ReviewChannel: Send + Sync {
    /// Creates or overwrites the seller reply on an order's review.
    async fn submit_reply(
        &self,
        order_id: &OrderId,
        rating: u8,
        text: &str,
    ) -> Result<(), HostError>;

    /// Removes the seller reply from an order's review.
    async fn delete_reply(&self, order_id: &OrderId) -> Result<(), HostError>;
}

/// Best-effort operator notifications.
///
/// Delivery failures are the implementation's problem; callers fire and
/// forget.
#[async_trait]
pub trait OperatorNotifier: Send + Sync {
    /// Sends a message to every registered operator.
    async fn notify(&self, text: &str);
}

/// Optional host capability to uninstall this plugin.
///
/// Passed explicitly at construction; hosts without the capability
/// simply provide `None` and the UI falls back to manual-removal
/// instructions.
#[async_trait]
pub trait PluginHost: Send + Sync {
    /// Uninstalls the plugin identified by `plugin_id`.
    async fn uninstall(&self, plugin_id: &str) -> Result<(), HostError>;
}
