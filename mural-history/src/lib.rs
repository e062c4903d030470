//! mural-history: snapshot undo/redo over a two-tier storage backend.
//!
//! Design rules:
//! - The in-memory stack (`base`, `len`, `index`) is the source of truth;
//!   backends are a cache of snapshot bytes.
//! - Snapshot writes try the async primary store first and fall back to the
//!   sync string store; callers never learn which one answered.
//! - The metadata record always lives in the sync store so a session can be
//!   reconstructed without an async round-trip.
//! - Entry keys are `prefix + absolute sequence`; a key is never reused.

pub mod config;
pub mod directory;
pub mod history;
pub mod local;
pub mod memory;
pub mod meta;
pub mod storage;
pub mod store;

pub use config::HistoryConfig;
pub use directory::DirectoryStore;
pub use history::{HistoryError, HistoryStore};
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use meta::HistoryMeta;
pub use storage::Storage;
pub use store::{SnapshotStore, StoreError, StoreResult, StringStore};
