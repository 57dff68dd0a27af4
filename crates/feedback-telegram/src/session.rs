//! Input-session tracking for the settings panel.
//!
//! Some settings (the API key) are collected as a plain chat message
//! after the operator taps the corresponding button. This store
//! remembers, per chat, that the next message is such an input and
//! which panel message to refresh once it arrives.

use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::{ChatId, MessageId};
use tokio::sync::RwLock;

/// What the next plain-text message from a chat will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// The message carries a new completion-API key.
    ApiKey,
}

/// An awaiting-input marker for one chat.
#[derive(Debug, Clone, Copy)]
pub struct InputSession {
    /// What kind of input is expected.
    pub mode: InputMode,
    /// The settings panel message to refresh after the input.
    pub panel_msg_id: MessageId,
}

/// Per-chat input sessions. Cheap to clone; clones share the map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<ChatId, InputSession>>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a chat into awaiting-input state, replacing any previous
    /// marker for that chat.
    pub async fn begin(&self, chat_id: ChatId, mode: InputMode, panel_msg_id: MessageId) {
        self.inner
            .write()
            .await
            .insert(chat_id, InputSession { mode, panel_msg_id });
    }

    /// Returns the active marker for a chat without clearing it; input
    /// that fails to parse keeps the chat in awaiting-input state.
    pub async fn get(&self, chat_id: ChatId) -> Option<InputSession> {
        self.inner.read().await.get(&chat_id).copied()
    }

    /// Clears the marker for a chat, returning it if one was active.
    pub async fn end(&self, chat_id: ChatId) -> Option<InputSession> {
        self.inner.write().await.remove(&chat_id)
    }
}
