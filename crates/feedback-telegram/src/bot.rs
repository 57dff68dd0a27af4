//! Main settings bot implementation.

use std::sync::Arc;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use tracing::{info, warn};

use feedback_completion::ReplyGenerator;
use feedback_persistence::ConfigStore;
use feedback_sync::PluginHost;

use crate::error::{Result, TelegramError};
use crate::handlers::{handle_callback, handle_command, handle_message, Command};
use crate::operators::OperatorRegistry;
use crate::session::SessionStore;

/// Shared state across handlers.
pub struct BotState {
    /// Plugin configuration storage.
    pub config: ConfigStore,
    /// Chats currently waiting for text input.
    pub sessions: SessionStore,
    /// Registered operator chats.
    pub operators: OperatorRegistry,
    /// Completion client used by the Test API button.
    pub generator: ReplyGenerator,
    /// Host hook for the delete-plugin flow, present when embedded.
    pub host: Option<Arc<dyn PluginHost>>,
}

/// The Telegram settings bot for GPT Feedback.
pub struct SettingsBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Shared state across handlers.
    state: Arc<BotState>,
}

impl SettingsBot {
    /// Create a new SettingsBot instance.
    ///
    /// Requires `TELEGRAM_BOT_TOKEN` environment variable to be set.
    pub fn new(state: BotState) -> Result<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| TelegramError::NoToken)?;
        Ok(Self::with_bot(Bot::new(token), state))
    }

    /// Create a SettingsBot around an existing bot handle.
    pub fn with_bot(bot: Bot, state: BotState) -> Self {
        Self {
            bot,
            state: Arc::new(state),
        }
    }

    /// A clone of the underlying bot handle, e.g. for a [`crate::TelegramNotifier`].
    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    /// Start the bot in polling mode and block until shutdown.
    pub async fn run(self) -> Result<()> {
        info!("Starting settings bot in polling mode...");

        let bot = self.bot.clone();

        let state_for_commands = Arc::clone(&self.state);
        let state_for_messages = Arc::clone(&self.state);
        let state_for_callbacks = Arc::clone(&self.state);

        let handler = dptree::entry()
            .branch(Update::filter_callback_query().endpoint(
                move |bot: Bot, q: teloxide::types::CallbackQuery| {
                    let state = Arc::clone(&state_for_callbacks);
                    async move { handle_callback(bot, q, state).await }
                },
            ))
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let state = Arc::clone(&state_for_commands);
                        info!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move { handle_command(bot, msg, cmd, state).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| {
                        // Commands that start with / but didn't parse
                        msg.text().map(|t| t.starts_with('/')).unwrap_or(false)
                    })
                    .endpoint(move |bot: Bot, msg: Message| async move {
                        if let Some(text) = msg.text() {
                            bot.send_message(
                                msg.chat.id,
                                format!(
                                    "Unknown command: {}\n\nUse /help to see available commands.",
                                    text.split_whitespace().next().unwrap_or(text)
                                ),
                            )
                            .await?;
                        }
                        Ok(())
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| {
                        // Only non-command text reaches the input handler
                        msg.text().map(|t| !t.starts_with('/')).unwrap_or(false)
                    })
                    .endpoint(move |bot: Bot, msg: Message| {
                        let state = Arc::clone(&state_for_messages);
                        async move { handle_message(bot, msg, state).await }
                    }),
            );

        info!("Settings bot is running! Send /start to begin.");

        Dispatcher::builder(bot, handler)
            .default_handler(|upd| async move {
                warn!("Unhandled update: {:?}", upd);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}
