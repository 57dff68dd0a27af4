//! Telegram settings bot for GPT Feedback.
//!
//! This crate provides the Telegram front end of the plugin: an
//! inline-keyboard menu for every setting, an input flow for the API
//! key, and a notifier that fans operator alerts out to registered
//! chats.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//!
//! Optional:
//! - `GPT_FEEDBACK_STATE_DIR`: Plugin storage directory override
//! - `GPT_FEEDBACK_API_URL`: Completion API base URL override
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use feedback_completion::{CompletionClient, ReplyGenerator};
//! use feedback_persistence::ConfigStore;
//! use feedback_telegram::{BotState, OperatorRegistry, SessionStore, SettingsBot};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dir = std::path::Path::new("storage/plugins/gpt_feedback");
//!     let state = BotState {
//!         config: ConfigStore::open(dir),
//!         sessions: SessionStore::default(),
//!         operators: OperatorRegistry::open(dir)?,
//!         generator: ReplyGenerator::new(Arc::new(CompletionClient::new()?)),
//!         host: None,
//!     };
//!
//!     SettingsBot::new(state)?.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Commands
//!
//! - `/start` - Register the chat for notifications and open the menu
//! - `/menu` - Open the menu
//! - `/help` - Show available commands

pub mod bot;
pub mod error;
pub mod handlers;
pub mod menu;
pub mod notifier;
pub mod operators;
pub mod session;

pub use bot::{BotState, SettingsBot};
pub use error::{Result, TelegramError};
pub use handlers::Command;
pub use notifier::TelegramNotifier;
pub use operators::OperatorRegistry;
pub use session::{InputMode, InputSession, SessionStore};
