//! Operator notifications over Telegram.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{debug, warn};

use feedback_sync::OperatorNotifier;

use crate::operators::OperatorRegistry;

/// Fans a notification out to every registered operator chat.
///
/// Delivery is best effort: a chat that blocked the bot is logged and
/// skipped, the remaining chats still receive the message.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    operators: OperatorRegistry,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, operators: OperatorRegistry) -> Self {
        Self { bot, operators }
    }
}

#[async_trait]
impl OperatorNotifier for TelegramNotifier {
    async fn notify(&self, text: &str) {
        let chats = self.operators.all();
        if chats.is_empty() {
            debug!("No operator chats registered, dropping notification");
            return;
        }

        for chat_id in chats {
            if let Err(e) = self.bot.send_message(ChatId(chat_id), text).await {
                warn!(chat_id, error = %e, "Failed to deliver operator notification");
            }
        }
    }
}
