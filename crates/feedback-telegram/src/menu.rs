//! Settings panel screens.
//!
//! Pure presentation: every screen is a text plus an inline keyboard
//! built from the current configuration, with no Telegram I/O, so the
//! whole menu can be asserted in unit tests. Texts use Telegram HTML.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::html;
use url::Url;

use feedback_models::{PluginConfig, PLUGIN_NAME};

/// Usage guide linked from the welcome screen.
pub const INSTRUCTION_URL: &str = "https://teletype.in/@tinechelovec/GPT-Feedback";

// Callback data, kept short: Telegram limits callback payloads to 64
// bytes.
pub const CB_WELCOME: &str = "gptfb:welcome";
pub const CB_SETTINGS: &str = "gptfb:settings";
pub const CB_TOGGLE: &str = "gptfb:toggle";
pub const CB_STARS: &str = "gptfb:stars";
pub const CB_STAR_TOGGLE: &str = "gptfb:star";
pub const CB_FIELDS: &str = "gptfb:fields";
pub const CB_FIELD_TOGGLE: &str = "gptfb:field";
pub const CB_APIKEY: &str = "gptfb:apikey";
pub const CB_TEST: &str = "gptfb:test";
pub const CB_CANCEL: &str = "gptfb:cancel";
pub const CB_DELETE: &str = "gptfb:delete";
pub const CB_DELETE_YES: &str = "gptfb:delete_yes";
pub const CB_DELETE_NO: &str = "gptfb:delete_no";
pub const CB_CLOSE: &str = "gptfb:close";

/// Masks an API key for display: `—` when unset, `****` for short
/// keys, first and last four characters otherwise.
pub fn mask_key(key: &str) -> String {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return "—".to_string();
    }
    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= 10 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

/// The status block shared by the welcome and settings screens.
fn status_summary(config: &PluginConfig) -> String {
    let key = config.api_key().unwrap_or("");
    format!(
        "Status: {}\nStars: {}\nAPI key: {} <code>{}</code>",
        if config.enabled { "✅ ON" } else { "❌ OFF" },
        config.stars_display(),
        if key.is_empty() { "❌ Not set" } else { "✅ Set" },
        mask_key(key),
    )
}

pub fn welcome_text(config: &PluginConfig) -> String {
    format!(
        "👋 <b>{PLUGIN_NAME}</b>\n\n{}\n\nPick an action:",
        status_summary(config)
    )
}

pub fn welcome_keyboard() -> InlineKeyboardMarkup {
    let instructions = Url::parse(INSTRUCTION_URL).expect("Invalid instruction URL");
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("⚙️ Settings", CB_SETTINGS),
            InlineKeyboardButton::url("📘 Instructions", instructions),
        ],
        vec![InlineKeyboardButton::callback("🗑 Delete plugin", CB_DELETE)],
        vec![InlineKeyboardButton::callback("✖️ Close menu", CB_CLOSE)],
    ])
}

pub fn settings_text(config: &PluginConfig) -> String {
    format!(
        "⚙️ <b>{PLUGIN_NAME} settings</b>\n\n{}\n\nTune the options below:",
        status_summary(config)
    )
}

pub fn settings_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("🔛 On/Off", CB_TOGGLE),
            InlineKeyboardButton::callback("⭐ Stars", CB_STARS),
        ],
        vec![
            InlineKeyboardButton::callback("🧾 Fields", CB_FIELDS),
            InlineKeyboardButton::callback("🔑 API key", CB_APIKEY),
        ],
        vec![InlineKeyboardButton::callback("🧪 Test API", CB_TEST)],
        vec![InlineKeyboardButton::callback("◀️ Back", CB_WELCOME)],
    ])
}

pub fn stars_text(config: &PluginConfig) -> String {
    format!(
        "⭐ <b>Which ratings get a reply?</b>\n\nCurrently enabled: <b>{}</b>\n\nTap a star to toggle it:",
        config.stars_display()
    )
}

pub fn stars_keyboard(config: &PluginConfig) -> InlineKeyboardMarkup {
    let star = |n: u8| {
        let marker = if config.stars.contains(&n) { "✅" } else { "⬜" };
        InlineKeyboardButton::callback(format!("{marker} {n}⭐"), format!("{CB_STAR_TOGGLE}:{n}"))
    };
    InlineKeyboardMarkup::new(vec![
        vec![star(1), star(2), star(3)],
        vec![star(4), star(5)],
        vec![InlineKeyboardButton::callback("◀️ Back", CB_SETTINGS)],
    ])
}

pub fn fields_text(config: &PluginConfig) -> String {
    let line = |key: &str, title: &str| {
        let marker = if config.fields.get(key).unwrap_or(false) {
            "✅"
        } else {
            "❌"
        };
        format!("{marker} {title}")
    };
    format!(
        "🧾 <b>Fields included in the prompt</b>\n\n{}\n{}\n{}\n{}\n{}\n\nTap to toggle:",
        line("name", "Buyer name"),
        line("item", "Item"),
        line("cost", "Price"),
        line("rating", "Rating (stars)"),
        line("text", "Review text"),
    )
}

pub fn fields_keyboard(config: &PluginConfig) -> InlineKeyboardMarkup {
    let button = |key: &str, label: &str| {
        let marker = if config.fields.get(key).unwrap_or(false) {
            "✅"
        } else {
            "❌"
        };
        InlineKeyboardButton::callback(
            format!("{marker} {label}"),
            format!("{CB_FIELD_TOGGLE}:{key}"),
        )
    };
    InlineKeyboardMarkup::new(vec![
        vec![button("name", "Name"), button("item", "Item")],
        vec![button("cost", "Price"), button("rating", "Rating")],
        vec![button("text", "Review")],
        vec![InlineKeyboardButton::callback("◀️ Back", CB_SETTINGS)],
    ])
}

pub fn api_key_text(config: &PluginConfig) -> String {
    format!(
        "🔑 <b>API key</b>\n\nCurrent: <code>{}</code>\n\n\
         Send the new key as a single message in this chat.\n\
         Tap ❌ Cancel to abort.",
        mask_key(config.api_key().unwrap_or(""))
    )
}

pub fn input_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("❌ Cancel", CB_CANCEL),
        InlineKeyboardButton::callback("◀️ Back", CB_SETTINGS),
    ]])
}

pub fn delete_text() -> String {
    format!(
        "🗑 <b>Plugin removal</b>\n\nReally delete <b>{PLUGIN_NAME}</b>?\n\
         This cannot always be undone."
    )
}

pub fn delete_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("✅ Yes, delete", CB_DELETE_YES),
            InlineKeyboardButton::callback("❌ No", CB_DELETE_NO),
        ],
        vec![InlineKeyboardButton::callback("◀️ Back", CB_WELCOME)],
    ])
}

pub fn delete_done_text() -> String {
    "✅ Plugin removed.\n\nIf it is still listed anywhere, restart the host.".to_string()
}

pub fn delete_manual_text(error: Option<&str>) -> String {
    format!(
        "❌ Could not remove the plugin automatically.\n\n\
         Manual removal:\n\
         1) Open your bot host's plugin list\n\
         2) Find <b>{PLUGIN_NAME}</b>\n\
         3) Tap <b>Delete</b>\n\n\
         Error (if any): <code>{}</code>",
        error.map(html::escape).unwrap_or_else(|| "—".to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data(button: &InlineKeyboardButton) -> Option<&str> {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => Some(data.as_str()),
            _ => None,
        }
    }

    #[test]
    fn mask_key_table() {
        assert_eq!(mask_key(""), "—");
        assert_eq!(mask_key("   "), "—");
        assert_eq!(mask_key("short"), "****");
        assert_eq!(mask_key("0123456789"), "****");
        assert_eq!(mask_key("abcdefghijk"), "abcd…hijk");
        assert_eq!(mask_key("  sk-12345678901234  "), "sk-1…1234");
    }

    #[test]
    fn mask_key_counts_characters_not_bytes() {
        // 12 characters, all multibyte
        assert_eq!(mask_key("ααββγγδδεεζζ"), "ααββ…εεζζ");
    }

    #[test]
    fn welcome_text_reflects_status() {
        let mut config = PluginConfig::default();
        assert!(welcome_text(&config).contains("❌ OFF"));
        assert!(welcome_text(&config).contains("❌ Not set"));

        config.enabled = true;
        config.api_key = "sk-12345678901234".to_string();
        let text = welcome_text(&config);
        assert!(text.contains("✅ ON"));
        assert!(text.contains("✅ Set"));
        assert!(text.contains("sk-1…1234"));
        assert!(!text.contains("sk-12345678901234"), "raw key leaked: {text}");
    }

    #[test]
    fn welcome_keyboard_links_the_instructions() {
        let keyboard = welcome_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 3);

        let row = &keyboard.inline_keyboard[0];
        assert_eq!(callback_data(&row[0]), Some(CB_SETTINGS));
        assert!(matches!(row[1].kind, InlineKeyboardButtonKind::Url(_)));
    }

    #[test]
    fn settings_keyboard_covers_every_action() {
        let keyboard = settings_keyboard();
        let data: Vec<_> = keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(callback_data)
            .collect();
        assert_eq!(
            data,
            vec![CB_TOGGLE, CB_STARS, CB_FIELDS, CB_APIKEY, CB_TEST, CB_WELCOME]
        );
    }

    #[test]
    fn stars_keyboard_marks_enabled_ratings() {
        let config = PluginConfig {
            stars: BTreeSet::from([1, 5]),
            ..PluginConfig::default()
        };
        let keyboard = stars_keyboard(&config);

        let one = &keyboard.inline_keyboard[0][0];
        assert_eq!(one.text, "✅ 1⭐");
        assert_eq!(callback_data(one), Some("gptfb:star:1"));

        let two = &keyboard.inline_keyboard[0][1];
        assert_eq!(two.text, "⬜ 2⭐");

        let five = &keyboard.inline_keyboard[1][1];
        assert_eq!(five.text, "✅ 5⭐");
    }

    #[test]
    fn stars_text_lists_current_selection() {
        let config = PluginConfig {
            stars: BTreeSet::from([4, 5]),
            ..PluginConfig::default()
        };
        assert!(stars_text(&config).contains("<b>4, 5</b>"));
    }

    #[test]
    fn fields_screen_tracks_toggles() {
        let mut config = PluginConfig::default();
        assert!(fields_text(&config).contains("✅ Price"));

        config.fields.toggle("cost");
        assert!(fields_text(&config).contains("❌ Price"));

        let keyboard = fields_keyboard(&config);
        let cost = &keyboard.inline_keyboard[1][0];
        assert_eq!(cost.text, "❌ Price");
        assert_eq!(callback_data(cost), Some("gptfb:field:cost"));
    }

    #[test]
    fn api_key_screen_shows_only_the_mask() {
        let config = PluginConfig {
            api_key: "sk-12345678901234".to_string(),
            ..PluginConfig::default()
        };
        let text = api_key_text(&config);
        assert!(text.contains("sk-1…1234"));
        assert!(!text.contains("sk-12345678901234"));
    }

    #[test]
    fn delete_manual_text_escapes_the_error() {
        let text = delete_manual_text(Some("boom <tag>"));
        assert!(text.contains("boom &lt;tag&gt;"));

        assert!(delete_manual_text(None).contains("<code>—</code>"));
    }
}
