use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ApoteoError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Export location: an http(s) URL or a local file path.
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub cache_dir: String,
}

fn default_cache_ttl_secs() -> u64 {
    600
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: String::new(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_dir: String::new(),
        }
    }
}

impl Settings {
    pub fn cache_dir(&self) -> PathBuf {
        if self.cache_dir.is_empty() {
            default_cache_dir()
        } else {
            PathBuf::from(&self.cache_dir)
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("apoteo")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cache")
        .join("apoteo")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ApoteoError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_exists() -> bool {
    settings_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            source: "https://example.org/export.csv".to_string(),
            cache_ttl_secs: 120,
            cache_dir: "/tmp/apoteo-cache".to_string(),
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.source, "https://example.org/export.csv");
        assert_eq!(loaded.cache_ttl_secs, 120);
        assert_eq!(loaded.cache_dir, "/tmp/apoteo-cache");
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.source.is_empty());
        assert_eq!(s.cache_ttl_secs, 600);
        assert!(!s.cache_dir().as_os_str().is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"source": "/data/export.csv"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.source, "/data/export.csv");
        assert_eq!(s.cache_ttl_secs, 600);
    }
}
