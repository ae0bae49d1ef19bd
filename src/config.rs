// Credential/endpoint resolution. Environment variables win over the
// persisted config file, which wins over the built-in default base URL.
// Resolution happens once, up front; the resulting `Settings` value is
// threaded into `AtlasClient` so nothing reads the environment at request
// time and tests can inject fixtures.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Production Atlas API base.
pub const DEFAULT_API_BASE: &str = "https://atlas-app.herokuapp.com/api/v1";

/// Environment override for the API key.
pub const API_KEY_ENV: &str = "ATLAS_API_KEY";

/// Environment override for the API base URL.
pub const API_BASE_ENV: &str = "ATLAS_API_BASE";

/// Fully resolved configuration handed to the client.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_base: String,
}

impl Settings {
    /// Resolve from the process environment and the persisted config file.
    pub fn load() -> Result<Self> {
        let stored = StoredConfig::read()?;
        Ok(Self::resolve(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(API_BASE_ENV).ok(),
            &stored,
        ))
    }

    /// Pure precedence logic: env override > stored value > default.
    pub fn resolve(
        env_key: Option<String>,
        env_base: Option<String>,
        stored: &StoredConfig,
    ) -> Self {
        let api_key = env_key
            .filter(|k| !k.is_empty())
            .or_else(|| stored.api_key.clone());
        let api_base = env_base
            .filter(|b| !b.is_empty())
            .or_else(|| stored.api_base.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Settings { api_key, api_base }
    }
}

/// On-disk shape of the config file (`~/.config/atlas/config.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl StoredConfig {
    /// Path to the config file in the user's config directory.
    pub fn path() -> PathBuf {
        let dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.join("atlas").join("config.json")
    }

    /// Read the persisted config; a missing file is an empty config.
    pub fn read() -> Result<Self> {
        let path = Self::path();
        if !path.exists() {
            return Ok(StoredConfig::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let cfg = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(cfg)
    }

    /// Persist the config, creating the parent directory as needed.
    pub fn write(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(&path, data)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn set_api_key(key: &str) -> Result<()> {
        let mut cfg = Self::read()?;
        cfg.api_key = Some(key.to_string());
        cfg.write()
    }

    pub fn clear_api_key() -> Result<()> {
        let mut cfg = Self::read()?;
        cfg.api_key = None;
        cfg.write()
    }

    pub fn set_api_base(url: &str) -> Result<()> {
        let mut cfg = Self::read()?;
        cfg.api_base = Some(url.to_string());
        cfg.write()
    }
}
