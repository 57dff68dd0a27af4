//! Inbound host events.
//!
//! The host delivers every runner update as a message event carrying a
//! kind and the raw message text. Only the three feedback kinds are
//! relevant to this plugin; the order identifier is recovered from the
//! message text, where the host always writes it after a `#` sign.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::order::OrderId;

/// Pattern matching an order identifier in host message text.
const ORDER_ID_PATTERN: &str = r"#([A-Za-z0-9]+)";

static ORDER_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn order_id_regex() -> &'static Regex {
    ORDER_ID_REGEX.get_or_init(|| {
        Regex::new(ORDER_ID_PATTERN).expect("order id pattern is a valid regex")
    })
}

/// Kind of an inbound host event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A buyer left a new review on an order.
    NewFeedback,
    /// An existing review was edited.
    FeedbackChanged,
    /// A review was deleted.
    FeedbackDeleted,
    /// A chat message unrelated to feedback.
    NewMessage,
    /// A new order was placed.
    NewOrder,
}

impl EventKind {
    /// Returns true for the three feedback kinds this plugin reacts to.
    pub fn is_feedback(self) -> bool {
        matches!(
            self,
            EventKind::NewFeedback | EventKind::FeedbackChanged | EventKind::FeedbackDeleted
        )
    }

    /// Returns true for the explicit deletion kind.
    pub fn is_deletion(self) -> bool {
        self == EventKind::FeedbackDeleted
    }
}

/// One inbound event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    /// What happened.
    pub kind: EventKind,

    /// Raw host message text; contains the order reference.
    pub message: String,
}

impl FeedbackEvent {
    /// Creates an event from its kind and raw message text.
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Extracts the order id from the message text, taking the first
    /// `#`-prefixed alphanumeric run. Returns `None` when the message
    /// carries no recognizable order reference.
    pub fn order_id(&self) -> Option<OrderId> {
        order_id_regex()
            .captures(&self.message)
            .and_then(|c| c.get(1))
            .map(|m| OrderId::new(m.as_str()))
    }
}
