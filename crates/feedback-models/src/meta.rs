//! Plugin identity.

/// Display name of the plugin.
pub const PLUGIN_NAME: &str = "GPT Feedback";

/// Plugin version shown to operators.
pub const PLUGIN_VERSION: &str = "1.2";

/// One-line description shown in plugin listings.
pub const PLUGIN_DESCRIPTION: &str =
    "Automatic AI-generated replies to marketplace reviews";

/// Stable identifier hosts use to address this plugin.
pub const PLUGIN_UUID: &str = "7c2f1a9e-4d31-4b6a-9f05-8be2c3a61d70";
