//! Telegram update handlers.
//!
//! One function per menu action, mirroring the callback constants in
//! [`crate::menu`]. Storage trouble never crashes a handler: it is
//! logged and reported on the callback answer instead.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId, ParseMode};
use teloxide::utils::command::BotCommands;
use teloxide::{ApiError, RequestError};
use tracing::{debug, info, warn};

use feedback_models::{PluginConfig, PromptFields, PLUGIN_UUID};

use crate::bot::BotState;
use crate::menu;
use crate::session::InputMode;

/// Prompt used by the Test API button.
const TEST_PROMPT: &str = "Write a short friendly reply to a customer review that says \
                           'everything was great'. One or two sentences, with emoji.";

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Register this chat for notifications and open the menu")]
    Start,

    #[command(description = "Open the GPT Feedback menu")]
    Menu,

    #[command(description = "Show help message")]
    Help,
}

/// Handles a parsed bot command.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    match cmd {
        Command::Start => {
            match state.operators.register(msg.chat.id.0) {
                Ok(true) => info!(chat_id = %msg.chat.id, "Operator registered"),
                Ok(false) => {}
                Err(e) => {
                    warn!(chat_id = %msg.chat.id, error = %e, "Failed to persist operator registration")
                }
            }
            send_panel(&bot, &msg, &state).await
        }
        Command::Menu => send_panel(&bot, &msg, &state).await,
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
            Ok(())
        }
    }
}

/// Sends a fresh welcome panel to the chat.
async fn send_panel(bot: &Bot, msg: &Message, state: &BotState) -> ResponseResult<()> {
    let config = match state.config.load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Failed to read configuration");
            bot.send_message(msg.chat.id, "⚠️ Settings storage is unavailable right now.")
                .await?;
            return Ok(());
        }
    };

    bot.send_message(msg.chat.id, menu::welcome_text(&config))
        .parse_mode(ParseMode::Html)
        .reply_markup(menu::welcome_keyboard())
        .await?;
    Ok(())
}

/// Handles inline-menu callbacks.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    let Some(data) = q.data.clone() else {
        return answer(&bot, &q).await;
    };
    // Panels live on regular messages; an inaccessible one cannot be
    // edited, so only the spinner gets dismissed.
    let Some(message) = q.regular_message() else {
        return answer(&bot, &q).await;
    };
    let chat_id = message.chat.id;
    let msg_id = message.id;

    debug!(chat_id = %chat_id, data = %data, "Menu callback");

    match data.as_str() {
        menu::CB_WELCOME => open_welcome(&bot, &q, chat_id, msg_id, &state).await,
        menu::CB_SETTINGS => open_settings(&bot, &q, chat_id, msg_id, &state).await,
        menu::CB_TOGGLE => toggle_enabled(&bot, &q, chat_id, msg_id, &state).await,
        menu::CB_STARS => open_stars(&bot, &q, chat_id, msg_id, &state).await,
        menu::CB_FIELDS => open_fields(&bot, &q, chat_id, msg_id, &state).await,
        menu::CB_APIKEY => start_key_input(&bot, &q, chat_id, msg_id, &state).await,
        menu::CB_CANCEL => cancel_input(&bot, &q, chat_id, msg_id, &state).await,
        menu::CB_TEST => run_api_test(&bot, &q, chat_id, &state).await,
        menu::CB_DELETE => open_delete(&bot, &q, chat_id, msg_id).await,
        menu::CB_DELETE_YES => confirm_delete(&bot, &q, chat_id, msg_id, &state).await,
        menu::CB_DELETE_NO => decline_delete(&bot, &q, chat_id, msg_id, &state).await,
        menu::CB_CLOSE => close_menu(&bot, &q, chat_id, msg_id).await,
        other => {
            if let Some(n) =
                toggle_target(other, menu::CB_STAR_TOGGLE).and_then(|s| s.parse::<u8>().ok())
            {
                toggle_star(&bot, &q, chat_id, msg_id, &state, n).await
            } else if let Some(key) = toggle_target(other, menu::CB_FIELD_TOGGLE) {
                toggle_field(&bot, &q, chat_id, msg_id, &state, key).await
            } else {
                debug!(data = %other, "Unknown callback data");
                answer(&bot, &q).await
            }
        }
    }
}

/// Handles plain text while a chat is in awaiting-input state.
pub async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let Some(session) = state.sessions.get(chat_id).await else {
        return Ok(());
    };

    // The raw secret must not stay visible in the chat history.
    let _ = bot.delete_message(chat_id, msg.id).await;

    let text = msg.text().map(str::trim).unwrap_or("");
    if text.is_empty() {
        return Ok(());
    }

    match session.mode {
        InputMode::ApiKey => {
            store_api_key(&bot, chat_id, session.panel_msg_id, text, &state).await
        }
    }
}

async fn store_api_key(
    bot: &Bot,
    chat_id: ChatId,
    panel_msg_id: MessageId,
    text: &str,
    state: &BotState,
) -> ResponseResult<()> {
    let key = parse_key_text(text);

    let config = match state.config.update(|cfg| cfg.api_key = key) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Failed to store API key");
            bot.send_message(chat_id, "⚠️ Could not save the key, try again.")
                .await?;
            return Ok(());
        }
    };

    state.sessions.end(chat_id).await;
    info!(chat_id = %chat_id, "API key updated");
    safe_edit(
        bot,
        chat_id,
        panel_msg_id,
        &menu::settings_text(&config),
        menu::settings_keyboard(),
    )
    .await
}

/// Extracts an API key from operator input.
///
/// Accepts a bare key, a multi-line paste (first non-empty line wins),
/// or a JSON object carrying the key under one of the usual names.
pub fn parse_key_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
            for name in ["api_key", "token", "key", "apikey"] {
                if let Some(key) = value.get(name).and_then(|v| v.as_str()) {
                    let key = key.trim();
                    if !key.is_empty() {
                        return key.to_string();
                    }
                }
            }
        }
    }

    trimmed
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(trimmed)
        .to_string()
}

fn toggle_target<'a>(data: &'a str, prefix: &str) -> Option<&'a str> {
    data.strip_prefix(prefix)?.strip_prefix(':')
}

/// True when toggling star `n` off would leave the allowed set empty.
fn would_empty_stars(config: &PluginConfig, n: u8) -> bool {
    config.stars.contains(&n) && config.stars.len() == 1
}

async fn open_welcome(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
    state: &BotState,
) -> ResponseResult<()> {
    state.sessions.end(chat_id).await;
    let Some(config) = read_config(bot, q, state).await? else {
        return Ok(());
    };
    answer(bot, q).await?;
    safe_edit(
        bot,
        chat_id,
        msg_id,
        &menu::welcome_text(&config),
        menu::welcome_keyboard(),
    )
    .await
}

async fn open_settings(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
    state: &BotState,
) -> ResponseResult<()> {
    // Navigating here also leaves any pending input mode.
    state.sessions.end(chat_id).await;
    let Some(config) = read_config(bot, q, state).await? else {
        return Ok(());
    };
    answer(bot, q).await?;
    safe_edit(
        bot,
        chat_id,
        msg_id,
        &menu::settings_text(&config),
        menu::settings_keyboard(),
    )
    .await
}

async fn toggle_enabled(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
    state: &BotState,
) -> ResponseResult<()> {
    let Some(config) = apply_update(bot, q, state, |cfg| cfg.enabled = !cfg.enabled).await? else {
        return Ok(());
    };
    answer_text(
        bot,
        q,
        if config.enabled {
            "Plugin enabled"
        } else {
            "Plugin disabled"
        },
    )
    .await?;
    safe_edit(
        bot,
        chat_id,
        msg_id,
        &menu::settings_text(&config),
        menu::settings_keyboard(),
    )
    .await
}

async fn open_stars(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
    state: &BotState,
) -> ResponseResult<()> {
    let Some(config) = read_config(bot, q, state).await? else {
        return Ok(());
    };
    answer(bot, q).await?;
    safe_edit(
        bot,
        chat_id,
        msg_id,
        &menu::stars_text(&config),
        menu::stars_keyboard(&config),
    )
    .await
}

async fn toggle_star(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
    state: &BotState,
    n: u8,
) -> ResponseResult<()> {
    let Some(current) = read_config(bot, q, state).await? else {
        return Ok(());
    };

    // The allowed set must never become empty.
    if would_empty_stars(&current, n) {
        return answer_alert(bot, q, "You can't turn off the last star.").await;
    }

    let Some(config) = apply_update(bot, q, state, |cfg| {
        if !cfg.stars.remove(&n) {
            cfg.stars.insert(n);
        }
    })
    .await?
    else {
        return Ok(());
    };

    answer_text(bot, q, &format!("Stars: {}", config.stars_display())).await?;
    safe_edit(
        bot,
        chat_id,
        msg_id,
        &menu::stars_text(&config),
        menu::stars_keyboard(&config),
    )
    .await
}

async fn open_fields(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
    state: &BotState,
) -> ResponseResult<()> {
    let Some(config) = read_config(bot, q, state).await? else {
        return Ok(());
    };
    answer(bot, q).await?;
    safe_edit(
        bot,
        chat_id,
        msg_id,
        &menu::fields_text(&config),
        menu::fields_keyboard(&config),
    )
    .await
}

async fn toggle_field(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
    state: &BotState,
    key: &str,
) -> ResponseResult<()> {
    if !PromptFields::KEYS.contains(&key) {
        return answer_text(bot, q, "Unknown field.").await;
    }

    let Some(config) = apply_update(bot, q, state, |cfg| {
        cfg.fields.toggle(key);
    })
    .await?
    else {
        return Ok(());
    };

    let on = config.fields.get(key).unwrap_or(false);
    answer_text(bot, q, &format!("{key}: {}", if on { "ON" } else { "OFF" })).await?;
    safe_edit(
        bot,
        chat_id,
        msg_id,
        &menu::fields_text(&config),
        menu::fields_keyboard(&config),
    )
    .await
}

async fn start_key_input(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
    state: &BotState,
) -> ResponseResult<()> {
    let Some(config) = read_config(bot, q, state).await? else {
        return Ok(());
    };
    state.sessions.begin(chat_id, InputMode::ApiKey, msg_id).await;
    answer(bot, q).await?;
    safe_edit(
        bot,
        chat_id,
        msg_id,
        &menu::api_key_text(&config),
        menu::input_keyboard(),
    )
    .await
}

async fn cancel_input(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
    state: &BotState,
) -> ResponseResult<()> {
    state.sessions.end(chat_id).await;
    let Some(config) = read_config(bot, q, state).await? else {
        return Ok(());
    };
    answer_text(bot, q, "Cancelled.").await?;
    safe_edit(
        bot,
        chat_id,
        msg_id,
        &menu::settings_text(&config),
        menu::settings_keyboard(),
    )
    .await
}

async fn run_api_test(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    state: &BotState,
) -> ResponseResult<()> {
    let Some(config) = read_config(bot, q, state).await? else {
        return Ok(());
    };

    let Some(api_key) = config.api_key().map(str::to_string) else {
        return answer_alert(bot, q, "Set an API key first (🔑 API key).").await;
    };

    answer(bot, q).await?;
    info!(chat_id = %chat_id, model = %config.model, "Running API test");

    let reply = state
        .generator
        .generate(TEST_PROMPT, &config.model, &api_key)
        .await;
    bot.send_message(chat_id, format!("🧪 API test:\n\n{reply}"))
        .await?;
    Ok(())
}

async fn open_delete(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
) -> ResponseResult<()> {
    answer(bot, q).await?;
    safe_edit(
        bot,
        chat_id,
        msg_id,
        &menu::delete_text(),
        menu::delete_keyboard(),
    )
    .await
}

async fn confirm_delete(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
    state: &BotState,
) -> ResponseResult<()> {
    answer(bot, q).await?;

    let Some(host) = &state.host else {
        return safe_edit(
            bot,
            chat_id,
            msg_id,
            &menu::delete_manual_text(None),
            menu::welcome_keyboard(),
        )
        .await;
    };

    match host.uninstall(PLUGIN_UUID).await {
        Ok(()) => {
            info!(chat_id = %chat_id, "Plugin uninstalled by operator");
            bot.edit_message_text(chat_id, msg_id, menu::delete_done_text())
                .await?;
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Host uninstall failed");
            safe_edit(
                bot,
                chat_id,
                msg_id,
                &menu::delete_manual_text(Some(&e.to_string())),
                menu::welcome_keyboard(),
            )
            .await
        }
    }
}

async fn decline_delete(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
    state: &BotState,
) -> ResponseResult<()> {
    let Some(config) = read_config(bot, q, state).await? else {
        return Ok(());
    };
    answer_text(bot, q, "Cancelled.").await?;
    safe_edit(
        bot,
        chat_id,
        msg_id,
        &menu::welcome_text(&config),
        menu::welcome_keyboard(),
    )
    .await
}

async fn close_menu(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    msg_id: MessageId,
) -> ResponseResult<()> {
    answer(bot, q).await?;
    let _ = bot.delete_message(chat_id, msg_id).await;
    Ok(())
}

/// Loads configuration, reporting storage trouble on the callback.
async fn read_config(
    bot: &Bot,
    q: &CallbackQuery,
    state: &BotState,
) -> ResponseResult<Option<PluginConfig>> {
    match state.config.load() {
        Ok(config) => Ok(Some(config)),
        Err(e) => {
            warn!(error = %e, "Failed to read configuration");
            answer_alert(bot, q, "⚠️ Settings storage is unavailable right now.").await?;
            Ok(None)
        }
    }
}

/// Applies a configuration mutation, reporting storage trouble on the
/// callback.
async fn apply_update<F>(
    bot: &Bot,
    q: &CallbackQuery,
    state: &BotState,
    mutate: F,
) -> ResponseResult<Option<PluginConfig>>
where
    F: FnOnce(&mut PluginConfig),
{
    match state.config.update(mutate) {
        Ok(config) => Ok(Some(config)),
        Err(e) => {
            warn!(error = %e, "Failed to write configuration");
            answer_alert(bot, q, "⚠️ Could not save the setting.").await?;
            Ok(None)
        }
    }
}

async fn answer(bot: &Bot, q: &CallbackQuery) -> ResponseResult<()> {
    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

async fn answer_text(bot: &Bot, q: &CallbackQuery, text: &str) -> ResponseResult<()> {
    bot.answer_callback_query(q.id.clone()).text(text).await?;
    Ok(())
}

async fn answer_alert(bot: &Bot, q: &CallbackQuery, text: &str) -> ResponseResult<()> {
    bot.answer_callback_query(q.id.clone())
        .text(text)
        .show_alert(true)
        .await?;
    Ok(())
}

/// Edits a panel message, swallowing the "message is not modified"
/// error Telegram returns when the content is already current.
async fn safe_edit(
    bot: &Bot,
    chat_id: ChatId,
    msg_id: MessageId,
    text: &str,
    keyboard: InlineKeyboardMarkup,
) -> ResponseResult<()> {
    let result = bot
        .edit_message_text(chat_id, msg_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await;
    match result {
        Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_text_takes_a_bare_key() {
        assert_eq!(parse_key_text("sk-abc123"), "sk-abc123");
        assert_eq!(parse_key_text("  sk-abc123  \n"), "sk-abc123");
    }

    #[test]
    fn parse_key_text_takes_first_non_empty_line() {
        assert_eq!(parse_key_text("\n\n  first-line  \nsecond"), "first-line");
    }

    #[test]
    fn parse_key_text_reads_json_objects() {
        assert_eq!(parse_key_text(r#"{"api_key": "sk-json"}"#), "sk-json");
        assert_eq!(parse_key_text(r#"{"token": "  sk-tok  "}"#), "sk-tok");
        assert_eq!(parse_key_text(r#"{"apikey": "sk-alt"}"#), "sk-alt");
    }

    #[test]
    fn parse_key_text_skips_blank_json_values() {
        assert_eq!(
            parse_key_text(r#"{"api_key": "  ", "key": "sk-real"}"#),
            "sk-real"
        );
    }

    #[test]
    fn parse_key_text_falls_back_on_unusable_json() {
        // Not valid JSON: the raw first line is used as-is.
        assert_eq!(parse_key_text("{not json}"), "{not json}");
        // Valid JSON without a recognized key name.
        assert_eq!(parse_key_text(r#"{"foo": "bar"}"#), r#"{"foo": "bar"}"#);
    }

    #[test]
    fn parse_key_text_of_blank_input_is_empty() {
        assert_eq!(parse_key_text(""), "");
        assert_eq!(parse_key_text("   \n  "), "");
    }

    #[test]
    fn toggle_target_requires_the_separator() {
        assert_eq!(toggle_target("gptfb:star:3", menu::CB_STAR_TOGGLE), Some("3"));
        assert_eq!(
            toggle_target("gptfb:field:cost", menu::CB_FIELD_TOGGLE),
            Some("cost")
        );
        assert_eq!(toggle_target("gptfb:star", menu::CB_STAR_TOGGLE), None);
        assert_eq!(toggle_target("gptfb:starx", menu::CB_STAR_TOGGLE), None);
        assert_eq!(toggle_target("gptfb:stars", menu::CB_STAR_TOGGLE), None);
    }

    #[test]
    fn last_star_cannot_be_toggled_off() {
        let mut config = PluginConfig::default();
        config.stars = std::collections::BTreeSet::from([5]);

        assert!(would_empty_stars(&config, 5));
        // Turning a different star on is always fine.
        assert!(!would_empty_stars(&config, 4));

        config.stars = std::collections::BTreeSet::from([4, 5]);
        assert!(!would_empty_stars(&config, 5));
    }
}
