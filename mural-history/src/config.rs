//! History configuration, loadable from JSON.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::local::DEFAULT_QUOTA_BYTES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Entries kept before the oldest are evicted.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    #[serde(default = "default_metadata_key")]
    pub metadata_key: String,

    #[serde(default = "default_fallback_quota_bytes")]
    pub fallback_quota_bytes: usize,
}

fn default_max_entries() -> usize {
    50
}

fn default_key_prefix() -> String {
    "canvas_history_".to_string()
}

fn default_metadata_key() -> String {
    "canvas_history_meta".to_string()
}

fn default_fallback_quota_bytes() -> usize {
    DEFAULT_QUOTA_BYTES
}

impl HistoryConfig {
    /// Storage key of the entry with absolute sequence `seq`.
    pub fn key(&self, seq: u64) -> String {
        format!("{}{}", self.key_prefix, seq)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            key_prefix: default_key_prefix(),
            metadata_key: default_metadata_key(),
            fallback_quota_bytes: default_fallback_quota_bytes(),
        }
    }
}

pub fn save_config(path: impl AsRef<Path>, config: &HistoryConfig) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(config).context("serialize history config")?;
    fs::write(path, json).with_context(|| format!("write history config: {}", path.display()))?;
    Ok(())
}

pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<HistoryConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("read history config: {}", path.display()))?;
    let config = serde_json::from_str(&data).context("parse history config json")?;
    Ok(config)
}
