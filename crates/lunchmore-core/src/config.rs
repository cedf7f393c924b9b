//! Client configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! includes the API base URL, the request timeout, and the last email used to
//! sign in.
//!
//! Configuration is stored at `~/.config/lunchmore/config.json`. The
//! `LUNCHMORE_API_URL` environment variable overrides the stored URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "lunchmore";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `api_url`
pub const API_URL_ENV: &str = "LUNCHMORE_API_URL";

/// Default API server, matching the server's default listen port
const DEFAULT_API_URL: &str = "http://localhost:8080";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub last_email: Option<String>,
    #[serde(skip)]
    cache_dir_override: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            last_email: None,
            cache_dir_override: None,
        }
    }
}

impl Config {
    /// Load the stored configuration (or defaults) and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Record the last sign-in email in the stored config.
    ///
    /// Only `last_email` is written; the stored file is reloaded first so
    /// `--api-url` and environment overrides on `self` never end up saved.
    pub fn remember_email(&mut self, email: &str) -> Result<()> {
        self.remember_email_at(&Self::config_path()?, email)
    }

    pub fn remember_email_at(&mut self, path: &Path, email: &str) -> Result<()> {
        self.last_email = Some(email.to_string());
        let mut stored = Self::load_from(path)?;
        stored.last_email = self.last_email.clone();
        stored.save_to(path)
    }

    /// Override `api_url` from the environment when set and non-empty
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_url = url.trim().to_string();
            }
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Use `dir` for the cache instead of the platform cache directory
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir_override = Some(dir.into());
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir_override {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.last_email.is_none());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"last_email": "a@b.com"}"#)
            .expect("valid config json");
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.last_email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = Config::default().with_api_url("https://lunch.example.com");
        config.last_email = Some("a@b.com".to_string());
        config.save_to(&path).expect("save config");

        let loaded = Config::load_from(&path).expect("load config");
        assert_eq!(loaded.api_url, "https://lunch.example.com");
        assert_eq!(loaded.last_email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_remember_email_keeps_stored_url() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE);
        Config::default()
            .with_api_url("https://lunch.example.com")
            .save_to(&path)
            .expect("save config");

        let mut config = Config::load_from(&path)
            .expect("load config")
            .with_api_url("http://one-off.invalid");
        config
            .remember_email_at(&path, "a@b.com")
            .expect("remember email");
        assert_eq!(config.last_email.as_deref(), Some("a@b.com"));
        assert_eq!(config.api_url, "http://one-off.invalid");

        let stored = Config::load_from(&path).expect("reload config");
        assert_eq!(stored.api_url, "https://lunch.example.com");
        assert_eq!(stored.last_email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_remember_email_without_stored_file_saves_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default().with_api_url("http://one-off.invalid");
        config
            .remember_email_at(&path, "a@b.com")
            .expect("remember email");

        let stored = Config::load_from(&path).expect("reload config");
        assert_eq!(stored.api_url, "http://localhost:8080");
        assert_eq!(stored.last_email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = Config::load_from(&dir.path().join(CONFIG_FILE)).expect("defaults");
        assert_eq!(loaded.api_url, Config::default().api_url);
    }

    #[test]
    fn test_cache_dir_override_is_not_serialized() {
        let config = Config::default().with_cache_dir("/tmp/lunchmore-test");
        assert_eq!(
            config.cache_dir().expect("override"),
            PathBuf::from("/tmp/lunchmore-test")
        );
        let value = serde_json::to_value(&config).expect("serializable");
        assert!(value.get("cache_dir_override").is_none());
    }
}
