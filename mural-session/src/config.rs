//! Session configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use mural_core::Rgb;
use mural_history::HistoryConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// Hex color the canvas starts with and is cleared back to.
    #[serde(default = "default_background")]
    pub background: Rgb,

    #[serde(default = "default_emission_interval_ms")]
    pub emission_interval_ms: u64,

    #[serde(default = "default_max_emissions_per_tick")]
    pub max_emissions_per_tick: u32,

    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    768
}

fn default_background() -> Rgb {
    Rgb::WHITE
}

fn default_emission_interval_ms() -> u64 {
    50
}

fn default_max_emissions_per_tick() -> u32 {
    8
}

impl SessionConfig {
    pub fn emission_interval(&self) -> Duration {
        Duration::from_millis(self.emission_interval_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            emission_interval_ms: default_emission_interval_ms(),
            max_emissions_per_tick: default_max_emissions_per_tick(),
            history: HistoryConfig::default(),
        }
    }
}

pub fn save_config(path: impl AsRef<Path>, config: &SessionConfig) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(config).context("serialize session config")?;
    fs::write(path, json).with_context(|| format!("write session config: {}", path.display()))?;
    Ok(())
}

pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<SessionConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("read session config: {}", path.display()))?;
    let config = serde_json::from_str(&data).context("parse session config json")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r##"{"width": 300, "background": "#000", "history": {"max_entries": 5}}"##)
                .unwrap();
        assert_eq!(config.width, 300);
        assert_eq!(config.height, 768);
        assert_eq!(config.background, Rgb::BLACK);
        assert_eq!(config.emission_interval(), Duration::from_millis(50));
        assert_eq!(config.history.max_entries, 5);
        assert_eq!(config.history.key_prefix, "canvas_history_");
    }

    #[test]
    fn test_bad_background_is_rejected() {
        assert!(serde_json::from_str::<SessionConfig>(r#"{"background": "teal"}"#).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::path::PathBuf::from("target")
            .join(format!("test-session-config-{}", std::process::id()))
            .join("session.json");
        let config = SessionConfig {
            width: 64,
            height: 48,
            ..SessionConfig::default()
        };
        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }
}
