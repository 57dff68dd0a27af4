//! Atomic file operations for crash-safe persistence.
//!
//! Every document this plugin persists is small and rewritten whole, so
//! each write goes to a temporary file in the target directory followed
//! by a rename. A crash mid-write leaves the previous file intact.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{PersistenceError, Result};

/// Writes bytes to `path` atomically, creating parent directories as
/// needed.
///
/// The temporary file lives in the same directory as the target so the
/// final rename never crosses a filesystem boundary.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let dir = path.parent().unwrap_or(Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|source| {
        PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;

    temp.write_all(data).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    temp.persist(path).map_err(|e| PersistenceError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

/// Serializes a value as pretty-printed JSON and writes it atomically.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

/// Reads and deserializes a JSON file.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&data)?)
}

/// Reads a JSON file, returning `None` if it does not exist.
pub fn read_json_optional<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reply.txt");

        atomic_write(&path, b"thank you").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "thank you");
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plugins/gpt_feedback/state.json");

        atomic_write(&path, b"{}").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn overwrite_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.json");

        let map = BTreeMap::from([("AB12".to_string(), 5u8)]);
        atomic_write_json(&path, &map).unwrap();

        let loaded: BTreeMap<String, u8> = read_json(&path).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn json_is_pretty_printed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.json");

        atomic_write_json(&path, &BTreeMap::from([("key".to_string(), 1)])).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'));
    }

    #[test]
    fn optional_read_of_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let loaded: Option<BTreeMap<String, u8>> = read_json_optional(&path).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn optional_read_of_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("present.json");
        atomic_write_json(&path, &BTreeMap::from([("x".to_string(), 9)])).unwrap();

        let loaded: Option<BTreeMap<String, u8>> = read_json_optional(&path).unwrap();
        assert_eq!(loaded, Some(BTreeMap::from([("x".to_string(), 9)])));
    }
}
