//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend URL, the token storage backend, and the
//! last signed-in email address.
//!
//! Configuration is stored at `~/.config/intellimail/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "intellimail";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend used when nothing else is configured (local development server)
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the configured backend URL
pub const API_URL_ENV: &str = "INTELLIMAIL_API_URL";

/// Where the token store keeps its durable copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    Keyring,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub storage: StorageKind,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve the backend base URL: environment, then config file, then default.
    pub fn api_base_url(&self) -> Result<Url> {
        let env_url = std::env::var(API_URL_ENV).ok().filter(|v| !v.trim().is_empty());
        Self::resolve_base_url(env_url.as_deref(), self.api_base_url.as_deref())
    }

    fn resolve_base_url(env_url: Option<&str>, configured: Option<&str>) -> Result<Url> {
        let raw = env_url.or(configured).unwrap_or(DEFAULT_API_BASE_URL);
        Url::parse(raw).with_context(|| format!("Invalid API base URL: {}", raw))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_base_url_precedence() {
        let url = Config::resolve_base_url(Some("https://env.example"), Some("https://cfg.example"))
            .unwrap();
        assert_eq!(url.as_str(), "https://env.example/");

        let url = Config::resolve_base_url(None, Some("https://cfg.example")).unwrap();
        assert_eq!(url.as_str(), "https://cfg.example/");

        let url = Config::resolve_base_url(None, None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_resolve_base_url_rejects_garbage() {
        assert!(Config::resolve_base_url(Some("not a url"), None).is_err());
    }

    #[test]
    fn test_storage_kind_serde() {
        let config: Config = serde_json::from_str(r#"{"storage": "keyring"}"#).unwrap();
        assert_eq!(config.storage, StorageKind::Keyring);

        // Older config files without the field fall back to file storage
        let config: Config = serde_json::from_str(r#"{"last_email": "a@x.com"}"#).unwrap();
        assert_eq!(config.storage, StorageKind::File);
        assert_eq!(config.last_email.as_deref(), Some("a@x.com"));
    }
}
