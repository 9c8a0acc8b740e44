//! Application configuration
//!
//! Resolved once at startup. A missing or malformed config file is never
//! fatal: loading falls back to the hard-coded defaults and logs what
//! happened.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// UDP port the listener binds
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// Remote engine host
    #[serde(default = "default_remote_ip")]
    pub remote_ip: String,
    /// Remote engine port
    #[serde(default = "default_send_port")]
    pub send_port: u16,
    /// Maximum outbound frame rate, Hz
    #[serde(default = "default_max_frame_rate")]
    pub max_frame_rate_hz: u32,
    /// Fixture count preallocated at startup
    #[serde(default = "default_fixture_count")]
    pub fixture_count: u32,
    /// Smallest allowed fixture count
    #[serde(default = "default_min_fixtures")]
    pub min_fixtures: u32,
    /// Largest allowed fixture count
    #[serde(default = "default_max_fixtures")]
    pub max_fixtures: u32,
    /// Tick interval in milliseconds (~30 Hz default)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Project file with the default fixture layout, loaded at startup
    #[serde(default)]
    pub project_path: Option<String>,
}

fn default_listen_port() -> u16 {
    9000
}

fn default_remote_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_send_port() -> u16 {
    9001
}

fn default_max_frame_rate() -> u32 {
    60
}

fn default_fixture_count() -> u32 {
    4
}

fn default_min_fixtures() -> u32 {
    4
}

fn default_max_fixtures() -> u32 {
    20
}

fn default_tick_interval_ms() -> u64 {
    33
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            remote_ip: default_remote_ip(),
            send_port: default_send_port(),
            max_frame_rate_hz: default_max_frame_rate(),
            fixture_count: default_fixture_count(),
            min_fixtures: default_min_fixtures(),
            max_fixtures: default_max_fixtures(),
            tick_interval_ms: default_tick_interval_ms(),
            project_path: None,
        }
    }
}

impl AppConfig {
    /// Default config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("lumapanel");
            path.push("config.json");
            path
        })
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path, falling back to defaults.
    ///
    /// An absent file is the normal first-run case and only logged at debug;
    /// a malformed file is logged as a warning. Neither blocks startup.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("no config file at {:?}, using defaults", path);
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("malformed config {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("cannot read config {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Save to the default location
    pub fn save(&self) -> Result<(), std::io::Error> {
        match Self::default_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    /// Save to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
    }

    /// The local listen address string
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.listen_port, 9000);
        assert_eq!(config.send_port, 9001);
        assert_eq!(config.remote_ip, "127.0.0.1");
        assert_eq!(config.max_frame_rate_hz, 60);
        assert_eq!(config.fixture_count, 4);
        assert_eq!(config.tick_interval_ms, 33);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        let config = AppConfig::load_from(&path);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"listen_port": 7000}"#).unwrap();
        let config = AppConfig::load_from(&path);
        assert_eq!(config.listen_port, 7000);
        assert_eq!(config.send_port, 9001);
        assert_eq!(config.fixture_count, 4);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = AppConfig::default();
        config.fixture_count = 12;
        config.remote_ip = "10.0.0.2".to_string();
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path), config);
    }
}
