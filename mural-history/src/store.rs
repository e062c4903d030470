// Backend contracts shared by both storage tiers.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("failed to (de)serialize store contents: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Primary tier: an async keyed collection of snapshot strings.
///
/// Implementations are opened once and shared; every call may fail
/// independently, in which case the caller falls back to the sync tier.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> StoreResult<()>;
    async fn clear(&self) -> StoreResult<()>;
}

/// Fallback tier: a synchronous string store with a size ceiling.
pub trait StringStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn delete(&self, key: &str) -> StoreResult<()>;
    fn clear(&self) -> StoreResult<()>;
}
