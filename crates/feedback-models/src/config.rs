//! Plugin configuration.
//!
//! A single global record controls the whole plugin: the enable gate,
//! which star ratings receive an automatic reply, the completion-API
//! credentials, and which order attributes are interpolated into the
//! prompt. The record is persisted as JSON and mutated only through the
//! settings UI.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Completion model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Which order attributes are interpolated into the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptFields {
    /// Buyer's display name.
    pub name: bool,

    /// Title of the purchased item.
    pub item: bool,

    /// Price paid.
    pub cost: bool,

    /// Star rating.
    pub rating: bool,

    /// Review text.
    pub text: bool,
}

impl Default for PromptFields {
    fn default() -> Self {
        Self {
            name: true,
            item: true,
            cost: true,
            rating: true,
            text: true,
        }
    }
}

impl PromptFields {
    /// Field keys in menu order.
    pub const KEYS: [&'static str; 5] = ["name", "item", "cost", "rating", "text"];

    /// Returns the state of a field by key, `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<bool> {
        match key {
            "name" => Some(self.name),
            "item" => Some(self.item),
            "cost" => Some(self.cost),
            "rating" => Some(self.rating),
            "text" => Some(self.text),
            _ => None,
        }
    }

    /// Flips a field by key, returning the new state, or `None` for
    /// unknown keys.
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        let slot = match key {
            "name" => &mut self.name,
            "item" => &mut self.item,
            "cost" => &mut self.cost,
            "rating" => &mut self.rating,
            "text" => &mut self.text,
            _ => return None,
        };
        *slot = !*slot;
        Some(*slot)
    }

    /// Returns true when every field is disabled.
    pub fn all_disabled(&self) -> bool {
        !(self.name || self.item || self.cost || self.rating || self.text)
    }
}

/// The global plugin configuration record.
///
/// Unknown keys in the stored JSON are ignored on read and dropped on
/// the next write; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Master enable gate; the synchronizer is inert while false.
    pub enabled: bool,

    /// Star ratings that receive an automatic reply. Never empty; kept
    /// sorted by the set representation.
    pub stars: BTreeSet<u8>,

    /// Completion-API key; empty means unconfigured.
    pub api_key: String,

    /// Completion model name.
    pub model: String,

    /// Prompt field selection.
    pub fields: PromptFields,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stars: BTreeSet::from([5]),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            fields: PromptFields::default(),
        }
    }
}

impl PluginConfig {
    /// Clamps the record back into its invariants: star values outside
    /// 1-5 are dropped, an emptied set reverts to `{5}`, and a blank
    /// model name reverts to the default.
    pub fn normalize(&mut self) {
        self.stars.retain(|s| (1..=5).contains(s));
        if self.stars.is_empty() {
            self.stars.insert(5);
        }
        if self.model.trim().is_empty() {
            self.model = DEFAULT_MODEL.to_string();
        }
    }

    /// The API key with surrounding whitespace stripped, `None` when
    /// unconfigured.
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }

    /// Returns true when the given rating is eligible for a reply.
    pub fn allows_stars(&self, stars: u8) -> bool {
        self.stars.contains(&stars)
    }

    /// Allowed stars rendered for display, e.g. `"4, 5"`.
    pub fn stars_display(&self) -> String {
        self.stars
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = PluginConfig::default();
        assert!(!cfg.enabled);
        assert_eq!(cfg.stars, BTreeSet::from([5]));
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.api_key(), None);
        assert!(cfg.fields.name && cfg.fields.text);
    }

    #[test]
    fn empty_document_deserializes_to_defaults() {
        let cfg: PluginConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, PluginConfig::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg: PluginConfig =
            serde_json::from_str(r#"{"enabled": true, "prompt": "legacy template"}"#).unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.stars, BTreeSet::from([5]));
    }

    #[test]
    fn normalize_drops_out_of_range_stars() {
        let mut cfg = PluginConfig {
            stars: BTreeSet::from([0, 3, 9]),
            ..PluginConfig::default()
        };
        cfg.normalize();
        assert_eq!(cfg.stars, BTreeSet::from([3]));
    }

    #[test]
    fn normalize_restores_default_star() {
        let mut cfg = PluginConfig {
            stars: BTreeSet::from([0, 6]),
            ..PluginConfig::default()
        };
        cfg.normalize();
        assert_eq!(cfg.stars, BTreeSet::from([5]));
    }

    #[test]
    fn normalize_restores_blank_model() {
        let mut cfg = PluginConfig {
            model: "  ".to_string(),
            ..PluginConfig::default()
        };
        cfg.normalize();
        assert_eq!(cfg.model, DEFAULT_MODEL);
    }

    #[test]
    fn api_key_is_trimmed() {
        let cfg = PluginConfig {
            api_key: "  sk-123  ".to_string(),
            ..PluginConfig::default()
        };
        assert_eq!(cfg.api_key(), Some("sk-123"));
    }

    #[test]
    fn stars_serialize_sorted() {
        let cfg = PluginConfig {
            stars: BTreeSet::from([5, 1, 3]),
            ..PluginConfig::default()
        };
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["stars"], serde_json::json!([1, 3, 5]));
    }

    #[test]
    fn field_toggle_round_trip() {
        let mut fields = PromptFields::default();
        assert_eq!(fields.toggle("cost"), Some(false));
        assert_eq!(fields.get("cost"), Some(false));
        assert_eq!(fields.toggle("cost"), Some(true));
        assert_eq!(fields.toggle("bogus"), None);
    }

    #[test]
    fn all_disabled_detection() {
        let mut fields = PromptFields::default();
        assert!(!fields.all_disabled());
        for key in PromptFields::KEYS {
            fields.toggle(key);
        }
        assert!(fields.all_disabled());
    }
}
