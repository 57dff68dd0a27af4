//! Registry of operator chats.
//!
//! Operators register by sending `/start`; notifications from the
//! synchronizer fan out to every registered chat. The registry is a
//! plain JSON array of chat ids next to the other plugin files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use feedback_persistence::atomic::{atomic_write_json, read_json_optional};
use feedback_persistence::{PersistenceError, Result};

/// Persistent set of operator chat ids. Cheap to clone; clones share
/// the set and its lock.
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Debug)]
struct RegistryInner {
    path: PathBuf,
    ids: Mutex<BTreeSet<i64>>,
}

impl OperatorRegistry {
    /// Opens the registry over `dir/operators.json`, loading any
    /// existing ids.
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join("operators.json");
        let ids = read_json_optional::<BTreeSet<i64>>(&path)?.unwrap_or_default();

        Ok(Self {
            inner: Arc::new(RegistryInner {
                path,
                ids: Mutex::new(ids),
            }),
        })
    }

    /// Adds a chat to the registry, persisting on change. Returns true
    /// when the chat was not registered before.
    pub fn register(&self, chat_id: i64) -> Result<bool> {
        let mut ids = self
            .inner
            .ids
            .lock()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;
        if !ids.insert(chat_id) {
            return Ok(false);
        }
        atomic_write_json(&self.inner.path, &*ids)?;
        Ok(true)
    }

    /// All registered chat ids.
    pub fn all(&self) -> Vec<i64> {
        self.inner
            .ids
            .lock()
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of registered chats.
    pub fn len(&self) -> usize {
        self.inner.ids.lock().map(|ids| ids.len()).unwrap_or(0)
    }

    /// Returns true when no chats are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn starts_empty_without_file() {
        let dir = tempdir().unwrap();
        let registry = OperatorRegistry::open(dir.path()).unwrap();

        assert!(registry.is_empty());
        assert!(registry.all().is_empty());
    }

    #[test]
    fn register_persists_and_deduplicates() {
        let dir = tempdir().unwrap();
        let registry = OperatorRegistry::open(dir.path()).unwrap();

        assert!(registry.register(42).unwrap());
        assert!(!registry.register(42).unwrap());
        assert!(registry.register(7).unwrap());

        assert_eq!(registry.all(), vec![7, 42]);

        let raw = fs::read_to_string(dir.path().join("operators.json")).unwrap();
        assert!(raw.contains("42"));
    }

    #[test]
    fn registrations_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let registry = OperatorRegistry::open(dir.path()).unwrap();
            registry.register(42).unwrap();
        }

        let registry = OperatorRegistry::open(dir.path()).unwrap();
        assert_eq!(registry.all(), vec![42]);
    }
}
