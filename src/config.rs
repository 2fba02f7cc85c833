//! Configuration management for couchtv
//!
//! Config is stored at ~/.config/couchtv/config.toml. Loading is lenient:
//! a missing or malformed file yields defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::playback::SessionConfig;

/// Environment variable overriding `active_profile`
pub const PROFILE_ENV: &str = "COUCHTV_PROFILE";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Profile used by CLI commands when none is given
    pub active_profile: Option<String>,
    /// Where history, favorites and profiles are stored
    pub data_dir: Option<PathBuf>,
    /// mpv executable
    pub player: String,
    /// Seconds moved per scrub input
    pub scrub_step_secs: f64,
    /// Quiet period before a scrub is committed
    pub scrub_commit_ms: u64,
    /// Delay before retrying a resume seek
    pub resume_retry_ms: u64,
    /// Minimum position worth saving on exit
    pub min_persist_secs: f64,
    /// Maximum watch history entries
    pub history_limit: usize,
    /// Default tracing filter, overridden by RUST_LOG
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_profile: None,
            data_dir: None,
            player: "mpv".to_string(),
            scrub_step_secs: 10.0,
            scrub_commit_ms: 2000,
            resume_retry_ms: 1000,
            min_persist_secs: 180.0,
            history_limit: 40,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Get config file path (~/.config/couchtv/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("couchtv").join("config.toml"))
    }

    /// Load config from the default path, or defaults
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from `path`, or defaults if unreadable
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(self).context("serializing config")?;
        std::fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Data directory: configured, else the platform data dir, else ./.couchtv
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("couchtv")))
            .unwrap_or_else(|| PathBuf::from(".couchtv"))
    }

    /// Active profile with the environment override applied
    pub fn active_profile(&self) -> Option<String> {
        std::env::var(PROFILE_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.active_profile.clone())
    }

    /// Playback session tunables
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            scrub_commit: Duration::from_millis(self.scrub_commit_ms),
            resume_retry: Duration::from_millis(self.resume_retry_ms),
            min_persist_secs: self.min_persist_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.active_profile.is_none());
        assert_eq!(config.player, "mpv");
        assert_eq!(config.history_limit, 40);
        assert_eq!(config.session(), SessionConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("scrub_step_secs = 30.0\nplayer = \"/usr/bin/mpv\"").unwrap();
        assert_eq!(config.scrub_step_secs, 30.0);
        assert_eq!(config.player, "/usr/bin/mpv");
        assert_eq!(config.scrub_commit_ms, 2000);
    }

    #[test]
    fn test_malformed_file_is_default() {
        let dir = std::env::temp_dir().join(format!("couchtv-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("couchtv-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("config.toml");
        let config = Config {
            active_profile: Some("home".into()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
