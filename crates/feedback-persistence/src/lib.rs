//! Persistence layer for the GPT Feedback plugin.
//!
//! This crate provides crash-safe persistence for the plugin's two JSON
//! documents using atomic file operations (write to a temp file, then
//! rename): the global configuration in `data.json` and the per-order
//! review state map in `state.json`.
//!
//! # Example
//!
//! ```no_run
//! use feedback_persistence::{ConfigStore, ReviewStateStore};
//! use std::path::Path;
//!
//! let dir = Path::new("storage/plugins/gpt_feedback");
//! let config = ConfigStore::open(dir);
//! let state = ReviewStateStore::open(dir).unwrap();
//!
//! let cfg = config.load().unwrap();
//! assert!(!cfg.enabled);
//! assert!(state.is_empty());
//! ```

pub mod atomic;
pub mod config_store;
pub mod error;
pub mod paths;
pub mod state_store;

pub use config_store::ConfigStore;
pub use error::{PersistenceError, Result};
pub use state_store::ReviewStateStore;
