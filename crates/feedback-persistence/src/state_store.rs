//! Store for the per-order review state map.
//!
//! The map is loaded once at open and then owned by this store: every
//! mutation updates the in-memory map and rewrites `state.json`
//! atomically while holding the store lock, so concurrent mutations
//! cannot lose entries to a read-modify-write race.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::warn;

use feedback_models::{OrderId, ReviewState};

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::{PersistenceError, Result};

type StateMap = BTreeMap<OrderId, ReviewState>;

/// Handle on the persisted review-state map. Cheap to clone; clones
/// share the map and its lock.
#[derive(Debug, Clone)]
pub struct ReviewStateStore {
    inner: Arc<StateStoreInner>,
}

#[derive(Debug)]
struct StateStoreInner {
    path: PathBuf,
    entries: Mutex<StateMap>,
}

impl ReviewStateStore {
    /// Opens the store over `dir/state.json`, loading any existing map.
    ///
    /// A file that exists but does not parse is treated as empty (the
    /// plugin then re-replies as reviews change rather than staying
    /// wedged on a corrupt file).
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join("state.json");
        let entries = match read_json_optional::<StateMap>(&path) {
            Ok(map) => map.unwrap_or_default(),
            Err(PersistenceError::Json(e)) => {
                warn!(path = %path.display(), error = %e, "Corrupt review state file, starting empty");
                StateMap::new()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            inner: Arc::new(StateStoreInner {
                path,
                entries: Mutex::new(entries),
            }),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Returns the tracked state for an order, if any.
    pub fn get(&self, order_id: &OrderId) -> Result<Option<ReviewState>> {
        let entries = self
            .inner
            .entries
            .lock()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;
        Ok(entries.get(order_id).cloned())
    }

    /// Inserts or replaces the state for an order and persists the map.
    pub fn upsert(&self, order_id: OrderId, state: ReviewState) -> Result<()> {
        let mut entries = self
            .inner
            .entries
            .lock()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;
        entries.insert(order_id, state);
        atomic_write_json(&self.inner.path, &*entries)
    }

    /// Removes the state for an order, persisting only when an entry
    /// was actually present. Returns the removed entry.
    pub fn remove(&self, order_id: &OrderId) -> Result<Option<ReviewState>> {
        let mut entries = self
            .inner
            .entries
            .lock()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;
        let removed = entries.remove(order_id);
        if removed.is_some() {
            atomic_write_json(&self.inner.path, &*entries)?;
        }
        Ok(removed)
    }

    /// Number of tracked orders.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns true when no orders are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
