// Linear undo/redo stack of canvas snapshots.

use mural_core::{Canvas, Snapshot, SnapshotError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::HistoryConfig;
use crate::meta::HistoryMeta;
use crate::storage::Storage;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to encode canvas snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Entries are the keys `key(base)..key(base + len)`; `index` points at the
/// snapshot currently shown, or -1 when the stack is empty.
#[derive(Debug)]
pub struct HistoryStore {
    config: HistoryConfig,
    storage: Storage,
    base: u64,
    len: usize,
    index: isize,
}

impl HistoryStore {
    /// Reconstruct the stack from the persisted metadata record. Snapshot
    /// bytes are not touched.
    pub fn open(config: HistoryConfig, storage: Storage) -> Self {
        let meta = match storage.read_meta(&config.metadata_key) {
            Some(meta) if meta.is_consistent() => meta,
            Some(meta) => {
                warn!(length = meta.length, index = meta.index, "inconsistent history metadata; starting empty");
                HistoryMeta {
                    base: meta.base + meta.length as u64,
                    ..HistoryMeta::EMPTY
                }
            }
            None => HistoryMeta::EMPTY,
        };
        info!(length = meta.length, index = meta.index, base = meta.base, "history opened");

        Self {
            config,
            storage,
            base: meta.base,
            len: meta.length,
            index: meta.index,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> isize {
        self.index
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.len as isize - 1
    }

    fn key_at(&self, position: usize) -> String {
        self.config.key(self.base + position as u64)
    }

    /// Storage keys of every entry, oldest first.
    pub fn keys(&self) -> Vec<String> {
        (0..self.len).map(|i| self.key_at(i)).collect()
    }

    /// Key of the entry at `index`, if any.
    pub fn current_key(&self) -> Option<String> {
        usize::try_from(self.index).ok().map(|i| self.key_at(i))
    }

    fn meta(&self) -> HistoryMeta {
        HistoryMeta {
            length: self.len,
            index: self.index,
            base: self.base,
        }
    }

    fn persist_meta(&self) {
        if let Err(err) = self.storage.write_meta(&self.config.metadata_key, &self.meta()) {
            warn!(error = %err, "failed to persist history metadata");
        }
    }

    /// Snapshot `canvas` as a new entry after the current one, discarding any
    /// redo branch and evicting the oldest entries past the cap. Returns the
    /// new entry's key. Storage failures are logged, never returned.
    pub async fn save(&mut self, canvas: &Canvas) -> Result<String, HistoryError> {
        let snapshot = Snapshot::encode(canvas)?;

        let keep = (self.index + 1) as usize;
        if keep < self.len {
            debug!(dropped = self.len - keep, "truncating redo branch");
            for position in keep..self.len {
                self.storage.delete(&self.key_at(position)).await;
            }
            self.len = keep;
        }

        let key = self.key_at(self.len);
        // The entry stays on the stack even if no tier accepted it; undoing
        // onto it becomes a no-op.
        if let Err(err) = self.storage.set(&key, snapshot.as_str()).await {
            warn!(key = %key, error = %err, "keeping history entry without stored snapshot");
        }
        self.len += 1;
        self.index = self.len as isize - 1;

        let cap = self.config.max_entries.max(1);
        while self.len > cap {
            let oldest = self.key_at(0);
            debug!(key = %oldest, "evicting oldest history entry");
            self.storage.delete(&oldest).await;
            self.base += 1;
            self.len -= 1;
            self.index -= 1;
        }

        self.persist_meta();
        debug!(key = %key, index = self.index, length = self.len, "history saved");
        Ok(key)
    }

    /// Step back one entry and paint it onto `canvas`. Returns whether the
    /// index moved; a missing or undecodable entry leaves both untouched.
    pub async fn undo(&mut self, canvas: &mut Canvas) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.step_to(self.index - 1, canvas).await
    }

    /// Step forward one entry; symmetric to [`HistoryStore::undo`].
    pub async fn redo(&mut self, canvas: &mut Canvas) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.step_to(self.index + 1, canvas).await
    }

    /// Paint the entry at `index` onto `canvas` without moving. Used to
    /// restore a reopened session.
    pub async fn restore_current(&self, canvas: &mut Canvas) -> bool {
        match usize::try_from(self.index) {
            Ok(position) => self.load_into(position, canvas).await,
            Err(_) => false,
        }
    }

    async fn step_to(&mut self, target: isize, canvas: &mut Canvas) -> bool {
        if !self.load_into(target as usize, canvas).await {
            return false;
        }
        self.index = target;
        self.persist_meta();
        debug!(index = self.index, "history moved");
        true
    }

    async fn load_into(&self, position: usize, canvas: &mut Canvas) -> bool {
        let key = self.key_at(position);
        let Some(raw) = self.storage.get(&key).await else {
            warn!(key = %key, "history entry missing from every tier");
            return false;
        };
        match Snapshot::from_data_url(raw).restore_into(canvas) {
            Ok(()) => true,
            Err(err) => {
                warn!(key = %key, error = %err, "history entry could not be decoded");
                false
            }
        }
    }

    /// Delete every entry (best-effort) and reset to an empty stack.
    pub async fn clear(&mut self) {
        for key in self.keys() {
            self.storage.delete(&key).await;
        }
        self.base += self.len as u64;
        self.len = 0;
        self.index = -1;
        self.persist_meta();
        info!("history cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalStore;
    use crate::memory::MemoryStore;
    use mural_core::Rgba;
    use std::sync::Arc;

    fn store(max_entries: usize) -> (HistoryStore, Arc<MemoryStore>, Arc<LocalStore>) {
        let primary = Arc::new(MemoryStore::new());
        let fallback = Arc::new(LocalStore::default());
        let storage = Storage::new(Some(primary.clone()), fallback.clone());
        let config = HistoryConfig {
            max_entries,
            ..HistoryConfig::default()
        };
        (HistoryStore::open(config, storage), primary, fallback)
    }

    fn canvas(shade: u8) -> Canvas {
        Canvas::new(8, 8, Rgba([shade, shade, shade, 255]))
    }

    #[tokio::test]
    async fn test_index_tracks_last_entry() {
        let (mut history, primary, _) = store(50);
        assert_eq!(history.index(), -1);
        for i in 0..4 {
            let key = history.save(&canvas(i)).await.unwrap();
            assert_eq!(history.index(), history.len() as isize - 1);
            assert!(primary.contains(&key));
        }
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[tokio::test]
    async fn test_undo_redo_paint_and_move() {
        let (mut history, _, _) = store(50);
        history.save(&canvas(10)).await.unwrap();
        history.save(&canvas(20)).await.unwrap();

        let mut surface = canvas(20);
        assert!(history.undo(&mut surface).await);
        assert_eq!(surface, canvas(10));
        assert!(!history.undo(&mut surface).await);
        assert_eq!(history.index(), 0);

        assert!(history.redo(&mut surface).await);
        assert_eq!(surface, canvas(20));
        assert!(!history.redo(&mut surface).await);
    }

    #[tokio::test]
    async fn test_eviction_keeps_keys_unique() {
        let (mut history, primary, _) = store(3);
        let mut keys = Vec::new();
        for i in 0..5 {
            keys.push(history.save(&canvas(i)).await.unwrap());
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.keys(), keys[2..].to_vec());
        assert!(!primary.contains(&keys[0]));
        assert!(!primary.contains(&keys[1]));
        assert_eq!(keys[4], "canvas_history_4");
    }

    #[tokio::test]
    async fn test_entry_kept_when_no_tier_accepts_it() {
        let storage = Storage::new(None, Arc::new(LocalStore::in_memory(4)));
        let mut history = HistoryStore::open(HistoryConfig::default(), storage);
        history.save(&canvas(1)).await.unwrap();
        history.save(&canvas(2)).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.index(), 1);

        let mut surface = canvas(2);
        assert!(!history.undo(&mut surface).await);
        assert_eq!(history.index(), 1);
        assert_eq!(surface, canvas(2));
    }

    #[tokio::test]
    async fn test_metadata_written_to_fallback() {
        let (mut history, primary, fallback) = store(50);
        history.save(&canvas(1)).await.unwrap();
        history.save(&canvas(2)).await.unwrap();

        use crate::store::StringStore;
        let raw = fallback.get("canvas_history_meta").unwrap().unwrap();
        let meta: HistoryMeta = serde_json::from_str(&raw).unwrap();
        assert_eq!(meta, HistoryMeta { length: 2, index: 1, base: 0 });
        assert!(!primary.contains("canvas_history_meta"));
    }

    #[tokio::test]
    async fn test_clear_resets_and_advances_base() {
        let (mut history, primary, _) = store(50);
        history.save(&canvas(1)).await.unwrap();
        history.save(&canvas(2)).await.unwrap();
        history.clear().await;

        assert_eq!(history.len(), 0);
        assert_eq!(history.index(), -1);
        assert!(!history.can_undo() && !history.can_redo());
        assert!(primary.is_empty());

        let key = history.save(&canvas(3)).await.unwrap();
        assert_eq!(key, "canvas_history_2");
    }
}
