//! Storage locations for the plugin.
//!
//! All plugin data lives in one directory:
//!
//! ```text
//! storage/plugins/gpt_feedback/
//! ├── data.json       # configuration (wrapped under the "global" key)
//! ├── state.json      # per-order review state map
//! └── operators.json  # Telegram chats receiving notifications
//! ```
//!
//! The directory is resolved relative to the host's working directory,
//! matching where the host keeps plugin storage; set
//! `GPT_FEEDBACK_STATE_DIR` to override it.

use std::path::PathBuf;

/// Environment variable overriding the storage directory.
pub const STATE_DIR_ENV: &str = "GPT_FEEDBACK_STATE_DIR";

/// Default storage directory, relative to the working directory.
const DEFAULT_STATE_DIR: &str = "storage/plugins/gpt_feedback";

/// Configuration file name.
const DATA_FILE: &str = "data.json";

/// Review-state file name.
const STATE_FILE: &str = "state.json";

/// Operator-registry file name.
const OPERATORS_FILE: &str = "operators.json";

/// Get the plugin storage directory.
///
/// Uses `GPT_FEEDBACK_STATE_DIR` when set, otherwise the default
/// host-relative path.
pub fn storage_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_DIR))
}

/// Get the configuration file path.
pub fn data_file() -> PathBuf {
    storage_dir().join(DATA_FILE)
}

/// Get the review-state file path.
pub fn state_file() -> PathBuf {
    storage_dir().join(STATE_FILE)
}

/// Get the operator-registry file path.
pub fn operators_file() -> PathBuf {
    storage_dir().join(OPERATORS_FILE)
}

/// Ensure the storage directory exists, creating it if necessary.
pub fn ensure_storage_dir() -> std::io::Result<()> {
    let dir = storage_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}
