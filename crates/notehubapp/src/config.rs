//! # Configuration
//!
//! Notehub configuration is managed by [`confique`], which handles layered loading
//! from environment variables, a TOML file and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `NOTEHUB_TOKEN`, `NOTEHUB_BASE_URL`, etc.
//! 2. **Config file**: `notehub.toml` in the OS config directory (via `directories`),
//!    or the file named by `NOTEHUB_CONFIG`.
//! 3. **Compiled defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `base_url` | `NOTEHUB_BASE_URL` | public NoteHub API | Notes collection URL |
//! | `token` | `NOTEHUB_TOKEN` | n/a | Static bearer token |
//! | `per_page` | `NOTEHUB_PER_PAGE` | `12` | Notes per page |
//! | `stale_time_secs` | `NOTEHUB_STALE_TIME_SECS` | `300` | Freshness window of cached pages |
//! | `debounce_ms` | `NOTEHUB_DEBOUNCE_MS` | `500` | Search debounce window |
//! | `request_timeout_secs` | `NOTEHUB_REQUEST_TIMEOUT_SECS` | `30` | HTTP request timeout |

use crate::error::{NotehubError, Result};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://notehub-public.goit.study/api/notes";
pub const CONFIG_FILENAME: &str = "notehub.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NotehubConfig {
    /// URL of the notes collection endpoint
    #[config(env = "NOTEHUB_BASE_URL", default = "https://notehub-public.goit.study/api/notes")]
    pub base_url: String,

    /// Static bearer token sent with every request
    #[config(env = "NOTEHUB_TOKEN")]
    pub token: Option<String>,

    #[config(env = "NOTEHUB_PER_PAGE", default = 12)]
    pub per_page: u32,

    #[config(env = "NOTEHUB_STALE_TIME_SECS", default = 300)]
    pub stale_time_secs: u64,

    #[config(env = "NOTEHUB_DEBOUNCE_MS", default = 500)]
    pub debounce_ms: u64,

    #[config(env = "NOTEHUB_REQUEST_TIMEOUT_SECS", default = 30)]
    pub request_timeout_secs: u64,
}

impl Default for NotehubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            per_page: 12,
            stale_time_secs: 300,
            debounce_ms: 500,
            request_timeout_secs: 30,
        }
    }
}

impl NotehubConfig {
    /// Loads from the environment, then `path` (skipped when missing), then defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        NotehubConfig::builder()
            .env()
            .file(path)
            .load()
            .map_err(|e| NotehubError::Config(e.to_string()))
    }

    /// Loads using [`default_config_path`].
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => NotehubConfig::builder()
                .env()
                .load()
                .map_err(|e| NotehubError::Config(e.to_string())),
        }
    }

    /// The bearer token, or a config error naming the variable to set.
    pub fn require_token(&self) -> Result<&str> {
        match self.token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(NotehubError::Config(
                "no API token configured; set NOTEHUB_TOKEN".to_string(),
            )),
        }
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Page size, never zero.
    pub fn per_page(&self) -> u32 {
        self.per_page.max(1)
    }
}

/// `NOTEHUB_CONFIG` if set, else `notehub.toml` in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("NOTEHUB_CONFIG") {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "notehub").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NotehubConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.per_page(), 12);
        assert_eq!(config.stale_time(), Duration::from_secs(300));
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_require_token() {
        let mut config = NotehubConfig::default();
        assert!(matches!(
            config.require_token(),
            Err(NotehubError::Config(_))
        ));

        config.token = Some("   ".into());
        assert!(config.require_token().is_err());

        config.token = Some("secret".into());
        assert_eq!(config.require_token().unwrap(), "secret");
    }

    #[test]
    fn test_per_page_never_zero() {
        let config = NotehubConfig {
            per_page: 0,
            ..Default::default()
        };
        assert_eq!(config.per_page(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "per_page = 6\ndebounce_ms = 250\n").unwrap();

        let config = NotehubConfig::load_from(&path).unwrap();
        assert_eq!(config.per_page, 6);
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.stale_time_secs, 300);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = NotehubConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
    }
}
