//! Fallback string store with a byte quota.
//!
//! Either purely in memory or mirrored to a single JSON file that is
//! rewritten synchronously after every mutation.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::store::{StoreError, StoreResult, StringStore};

/// Default ceiling, matching what browsers typically grant local storage.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug)]
pub struct LocalStore {
    entries: Mutex<BTreeMap<String, String>>,
    path: Option<PathBuf>,
    quota: usize,
}

fn footprint(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

impl LocalStore {
    pub fn in_memory(quota: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            path: None,
            quota,
        }
    }

    /// Load the store persisted at `path`, or start empty if it doesn't exist.
    pub fn open(path: impl AsRef<Path>, quota: usize) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "opened local store");
        Ok(Self {
            entries: Mutex::new(entries),
            path: Some(path),
            quota,
        })
    }

    pub fn used_bytes(&self) -> usize {
        self.entries
            .lock()
            .iter()
            .map(|(k, v)| footprint(k, v))
            .sum()
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string(entries)?)?;
        Ok(())
    }
}

impl StringStore for LocalStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock();
        let replaced = entries.get(key).map_or(0, |old| footprint(key, old));
        let used: usize = entries.iter().map(|(k, v)| footprint(k, v)).sum();
        let needed = used - replaced + footprint(key, value);
        if needed > self.quota {
            warn!(key, needed, quota = self.quota, "local store quota exceeded");
            return Err(StoreError::QuotaExceeded {
                needed,
                quota: self.quota,
            });
        }

        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(err) = self.persist(&entries) {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut entries = self.entries.lock();
        entries.clear();
        self.persist(&entries)
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::in_memory(DEFAULT_QUOTA_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_rejects_oversized_writes() {
        let store = LocalStore::in_memory(10);
        store.set("a", "12345").unwrap();
        let err = store.set("b", "1234567").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { needed: 14, quota: 10 }));
        assert!(!store.contains("b"));

        // Replacing a value only counts the difference.
        store.set("a", "123456789").unwrap();
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let path = PathBuf::from("target").join(format!("test-local-store-{}.json", std::process::id()));
        let _ = fs::remove_file(&path);

        let store = LocalStore::open(&path, DEFAULT_QUOTA_BYTES).unwrap();
        store.set("canvas_history_meta", r#"{"length":1,"index":0}"#).unwrap();
        store.set("other", "x").unwrap();
        store.delete("other").unwrap();
        drop(store);

        let reopened = LocalStore::open(&path, DEFAULT_QUOTA_BYTES).unwrap();
        assert_eq!(
            reopened.get("canvas_history_meta").unwrap().as_deref(),
            Some(r#"{"length":1,"index":0}"#)
        );
        assert!(!reopened.contains("other"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_a_serialization_error() {
        let path = PathBuf::from("target").join(format!("test-local-corrupt-{}.json", std::process::id()));
        fs::create_dir_all("target").unwrap();
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            LocalStore::open(&path, 100),
            Err(StoreError::Serialization(_))
        ));
        let _ = fs::remove_file(&path);
    }
}
