//! Key-value storage substrate
//!
//! The original system persisted to a browser-style string key/value store.
//! That seam is kept as the `KeyValueStore` trait so the repository and
//! migration engine stay independent of where the bytes live. `FileStore`
//! maps each key to one file under the data directory; `MemoryStore` backs
//! tests and doubles as the corruption-injection point.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::config::TrackerPaths;
use crate::error::TrackerError;

use super::file_io::{read_string, remove_if_exists, write_string_atomic};

/// String key/value persistence boundary
///
/// All operations are all-or-nothing: a `set` either lands completely or
/// leaves the previous value intact.
pub trait KeyValueStore {
    /// Read the value stored at `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, TrackerError>;

    /// Store `value` at `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), TrackerError>;

    /// Remove the value at `key`; removing an absent key succeeds
    fn remove(&self, key: &str) -> Result<(), TrackerError>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, TrackerError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TrackerError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), TrackerError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one file per key under the store directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at the configured store directory
    pub fn new(paths: &TrackerPaths) -> Result<Self, TrackerError> {
        paths.ensure_directories()?;
        Ok(Self {
            dir: paths.store_dir(),
        })
    }

    /// Create a file store rooted at an explicit directory (tests)
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Map a store key to its on-disk path
    ///
    /// Keys may contain separators (`fin-tracker/v1`); everything outside
    /// `[A-Za-z0-9._-]` becomes `_` so each key is a flat filename.
    fn key_path(&self, key: &str) -> PathBuf {
        let sanitized: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", sanitized))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, TrackerError> {
        read_string(self.key_path(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TrackerError> {
        write_string_atomic(self.key_path(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), TrackerError> {
        remove_if_exists(self.key_path(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));

        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        // Removing an absent key succeeds
        store.remove("k").unwrap();
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::with_dir(temp_dir.path().to_path_buf());

        assert_eq!(store.get("fin-tracker/v1").unwrap(), None);

        store.set("fin-tracker/v1", r#"{"schemaVersion":1}"#).unwrap();
        assert_eq!(
            store.get("fin-tracker/v1").unwrap().as_deref(),
            Some(r#"{"schemaVersion":1}"#)
        );

        store.remove("fin-tracker/v1").unwrap();
        assert_eq!(store.get("fin-tracker/v1").unwrap(), None);
    }

    #[test]
    fn test_key_sanitization_keeps_keys_distinct_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::with_dir(temp_dir.path().to_path_buf());

        store.set("fin-tracker/v1", "primary").unwrap();
        store.set("fin_accounts", "legacy").unwrap();

        assert!(temp_dir.path().join("fin-tracker_v1.json").exists());
        assert!(temp_dir.path().join("fin_accounts.json").exists());
        assert_eq!(store.get("fin-tracker/v1").unwrap().as_deref(), Some("primary"));
        assert_eq!(store.get("fin_accounts").unwrap().as_deref(), Some("legacy"));
    }
}
