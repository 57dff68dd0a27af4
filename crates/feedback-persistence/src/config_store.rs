//! Store for the global plugin configuration.
//!
//! `data.json` is a JSON object whose `"global"` entry holds the
//! configuration record. Reads always go to disk so that settings-UI
//! edits take effect on the very next event; writes are serialized
//! through the store lock and flushed atomically.
//!
//! Early plugin versions kept one record per Telegram chat instead of
//! the `"global"` entry. When no `"global"` entry exists but some value
//! in the document looks like a configuration record, that value is
//! promoted to `"global"` and persisted; other document keys are left
//! in place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::warn;

use feedback_models::PluginConfig;

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::{PersistenceError, Result};

/// Document key holding the configuration record.
const GLOBAL_KEY: &str = "global";

/// Handle on the persisted configuration. Cheap to clone; clones share
/// the write lock.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    inner: Arc<ConfigStoreInner>,
}

#[derive(Debug)]
struct ConfigStoreInner {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ConfigStore {
    /// Opens the store over `dir/data.json`. The file is created lazily
    /// on first load.
    pub fn open(dir: &Path) -> Self {
        Self {
            inner: Arc::new(ConfigStoreInner {
                path: dir.join("data.json"),
                lock: Mutex::new(()),
            }),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Loads the configuration fresh from disk.
    ///
    /// On first access (or when only a legacy per-chat record exists)
    /// the resolved record is persisted under `"global"`.
    pub fn load(&self) -> Result<PluginConfig> {
        let _guard = self
            .inner
            .lock
            .lock()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;

        let (config, _) = self.resolve()?;
        Ok(config)
    }

    /// Applies a mutation to the configuration and persists the result.
    ///
    /// The record is re-read from disk under the lock, mutated,
    /// normalized, and written back; the updated record is returned.
    pub fn update<F>(&self, mutate: F) -> Result<PluginConfig>
    where
        F: FnOnce(&mut PluginConfig),
    {
        let _guard = self
            .inner
            .lock
            .lock()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;

        let (mut config, mut doc) = self.resolve()?;
        mutate(&mut config);
        config.normalize();

        doc.insert(GLOBAL_KEY.to_string(), serde_json::to_value(&config)?);
        atomic_write_json(&self.inner.path, &doc)?;
        Ok(config)
    }

    /// Reads the document and resolves the configuration record,
    /// persisting when the record had to be created or promoted.
    /// Callers must hold the store lock.
    fn resolve(&self) -> Result<(PluginConfig, BTreeMap<String, Value>)> {
        let mut doc: BTreeMap<String, Value> =
            read_json_optional(&self.inner.path)?.unwrap_or_default();

        if let Some(value) = doc.get(GLOBAL_KEY) {
            let config = deserialize_lenient(&self.inner.path, value);
            return Ok((config, doc));
        }

        // Legacy layout: promote the first config-shaped value.
        let legacy = doc
            .values()
            .find(|v| looks_like_config(v))
            .cloned();
        let config = match legacy {
            Some(value) => deserialize_lenient(&self.inner.path, &value),
            None => PluginConfig::default(),
        };

        doc.insert(GLOBAL_KEY.to_string(), serde_json::to_value(&config)?);
        atomic_write_json(&self.inner.path, &doc)?;
        Ok((config, doc))
    }
}

/// Deserializes a stored record, falling back to defaults when the
/// value has the wrong shape. Missing keys take their defaults; unknown
/// keys are ignored.
fn deserialize_lenient(path: &Path, value: &Value) -> PluginConfig {
    let mut config = match serde_json::from_value::<PluginConfig>(value.clone()) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Malformed configuration record, using defaults");
            PluginConfig::default()
        }
    };
    config.normalize();
    config
}

/// A value counts as a configuration record when it is an object
/// carrying at least one of the well-known keys.
fn looks_like_config(value: &Value) -> bool {
    value.as_object().is_some_and(|o| {
        o.contains_key("api_key") || o.contains_key("enabled") || o.contains_key("stars")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn first_load_creates_defaults() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::open(dir.path());

        let config = store.load().unwrap();

        assert_eq!(config, PluginConfig::default());
        let raw = fs::read_to_string(dir.path().join("data.json")).unwrap();
        assert!(raw.contains("\"global\""));
    }

    #[test]
    fn update_persists_and_is_visible_to_load() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::open(dir.path());

        store
            .update(|cfg| {
                cfg.enabled = true;
                cfg.api_key = "sk-test".to_string();
            })
            .unwrap();

        let config = store.load().unwrap();
        assert!(config.enabled);
        assert_eq!(config.api_key(), Some("sk-test"));
    }

    #[test]
    fn load_reads_fresh_from_disk() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::open(dir.path());
        store.load().unwrap();

        // Simulate an edit from another handle on the same file.
        let other = ConfigStore::open(dir.path());
        other.update(|cfg| cfg.enabled = true).unwrap();

        assert!(store.load().unwrap().enabled);
    }

    #[test]
    fn legacy_record_is_promoted_to_global() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"{"123456789": {"enabled": true, "stars": [4, 5], "api_key": "sk-old"}}"#,
        )
        .unwrap();

        let store = ConfigStore::open(dir.path());
        let config = store.load().unwrap();

        assert!(config.enabled);
        assert_eq!(config.stars, BTreeSet::from([4, 5]));
        assert_eq!(config.api_key(), Some("sk-old"));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"global\""));
        assert!(raw.contains("\"123456789\""));
    }

    #[test]
    fn malformed_record_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"global": {"enabled": "yes", "stars": "all"}}"#).unwrap();

        let store = ConfigStore::open(dir.path());
        assert_eq!(store.load().unwrap(), PluginConfig::default());
    }

    #[test]
    fn update_normalizes_star_set() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::open(dir.path());

        let config = store.update(|cfg| cfg.stars.clear()).unwrap();

        assert_eq!(config.stars, BTreeSet::from([5]));
    }

    #[test]
    fn unknown_keys_inside_global_disappear_on_update() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"{"global": {"enabled": true, "prompt": "legacy template"}}"#,
        )
        .unwrap();

        let store = ConfigStore::open(dir.path());
        store.update(|_| {}).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("legacy template"));
    }
}
