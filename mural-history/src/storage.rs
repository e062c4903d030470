//! Fallback-aware facade over the two storage tiers.

use std::sync::Arc;

use tracing::{debug, error, info, trace, warn};

use crate::meta::HistoryMeta;
use crate::store::{SnapshotStore, StoreResult, StringStore};

const PROBE_KEY: &str = "__mural_probe__";

pub struct Storage {
    primary: Option<Arc<dyn SnapshotStore>>,
    fallback: Arc<dyn StringStore>,
}

impl Storage {
    /// Build the facade, probing `primary` once. A primary that fails the
    /// probe is dropped and every call goes straight to `fallback`.
    pub async fn open(primary: Option<Arc<dyn SnapshotStore>>, fallback: Arc<dyn StringStore>) -> Self {
        let primary = match primary {
            Some(store) => match store.get(PROBE_KEY).await {
                Ok(_) => {
                    info!("primary snapshot store available");
                    Some(store)
                }
                Err(err) => {
                    info!(error = %err, "primary snapshot store unavailable; using fallback only");
                    None
                }
            },
            None => {
                info!("no primary snapshot store configured; using fallback only");
                None
            }
        };
        Self { primary, fallback }
    }

    /// Facade that never probes, for callers that already know the primary is fine.
    pub fn new(primary: Option<Arc<dyn SnapshotStore>>, fallback: Arc<dyn StringStore>) -> Self {
        Self { primary, fallback }
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Primary first; a miss or failure falls through to the fallback tier.
    pub async fn get(&self, key: &str) -> Option<String> {
        if let Some(primary) = &self.primary {
            match primary.get(key).await {
                Ok(Some(value)) => {
                    trace!(key, tier = "primary", "snapshot read");
                    return Some(value);
                }
                Ok(None) => {}
                Err(err) => warn!(key, error = %err, "primary read failed; trying fallback"),
            }
        }
        match self.fallback.get(key) {
            Ok(value) => {
                trace!(key, tier = "fallback", found = value.is_some(), "snapshot read");
                value
            }
            Err(err) => {
                warn!(key, error = %err, "fallback read failed");
                None
            }
        }
    }

    /// Write to the primary tier, or to the fallback if that fails. Errors
    /// only when both tiers reject the value.
    pub async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(primary) = &self.primary {
            match primary.set(key, value).await {
                Ok(()) => {
                    trace!(key, tier = "primary", len = value.len(), "snapshot written");
                    return Ok(());
                }
                Err(err) => warn!(key, error = %err, "primary write failed; using fallback"),
            }
        }
        self.fallback.set(key, value).map_err(|err| {
            error!(key, error = %err, "snapshot write failed on every tier");
            err
        })
    }

    /// Best-effort removal from both tiers.
    pub async fn delete(&self, key: &str) {
        if let Some(primary) = &self.primary {
            if let Err(err) = primary.delete(key).await {
                warn!(key, error = %err, "primary delete failed");
            }
        }
        if let Err(err) = self.fallback.delete(key) {
            warn!(key, error = %err, "fallback delete failed");
        }
    }

    /// Best-effort wipe of both tiers, the metadata record included. History
    /// never calls this; `HistoryStore::clear` deletes its own keys instead.
    pub async fn clear(&self) {
        if let Some(primary) = &self.primary {
            if let Err(err) = primary.clear().await {
                warn!(error = %err, "primary clear failed");
            }
        }
        if let Err(err) = self.fallback.clear() {
            warn!(error = %err, "fallback clear failed");
        }
    }

    /// Synchronous metadata read from the fallback tier. Missing or
    /// unreadable records yield `None`.
    pub fn read_meta(&self, key: &str) -> Option<HistoryMeta> {
        let raw = match self.fallback.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "failed to read history metadata");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(meta) => Some(meta),
            Err(err) => {
                warn!(key, error = %err, "discarding malformed history metadata");
                None
            }
        }
    }

    pub fn write_meta(&self, key: &str, meta: &HistoryMeta) -> StoreResult<()> {
        let raw = serde_json::to_string(meta)?;
        self.fallback.set(key, &raw)?;
        debug!(key, length = meta.length, index = meta.index, base = meta.base, "history metadata written");
        Ok(())
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("has_primary", &self.has_primary())
            .finish_non_exhaustive()
    }
}
