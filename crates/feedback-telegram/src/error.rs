//! Error types for the settings bot.

use thiserror::Error;

/// Errors that can occur while running the settings bot.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN environment variable.")]
    NoToken,

    /// Plugin storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] feedback_persistence::PersistenceError),

    /// A Telegram API call failed.
    #[error("Telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
}

/// Result type for settings-bot operations.
pub type Result<T> = std::result::Result<T, TelegramError>;
