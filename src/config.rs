//! Client configuration.
//!
//! Configuration is stored in `config.yaml` inside the issuedesk home
//! directory and includes:
//! - The API base URL and request timeout
//! - The default list page size
//!
//! The home directory is the platform config dir unless `ISSUEDESK_HOME` is
//! set. `ISSUEDESK_API_URL` overrides the configured base URL.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DeskError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:4500";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub const HOME_ENV: &str = "ISSUEDESK_HOME";
pub const API_URL_ENV: &str = "ISSUEDESK_API_URL";

/// Settable keys, as accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &["api.base_url", "api.timeout_secs", "list.page_size"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub list: ListConfig,
}

/// HTTP API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The base URL with any trailing slash removed, after checking it parses.
    pub fn base_url(&self) -> Result<String> {
        let parsed = Url::parse(&self.base_url)
            .map_err(|e| DeskError::InvalidUrl(self.base_url.clone(), e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DeskError::InvalidUrl(
                self.base_url.clone(),
                "scheme must be http or https".to_string(),
            ));
        }
        Ok(self.base_url.trim_end_matches('/').to_string())
    }
}

/// List view settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Directory holding `config.yaml` and `session.json`.
pub fn home_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(HOME_ENV)
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "issuedesk")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| DeskError::Config("could not determine a home directory".to_string()))
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(home_dir()?.join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found.
    /// Environment overrides are applied on top.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from file only, ignoring environment overrides
    pub fn load_file() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            self.api.base_url = url;
        }
    }

    /// Read a single key
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api.base_url" => Ok(self.api.base_url.clone()),
            "api.timeout_secs" => Ok(self.api.timeout_secs.to_string()),
            "list.page_size" => Ok(self.list.page_size.to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a single key, validating the value
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                let candidate = ApiConfig {
                    base_url: value.to_string(),
                    ..self.api.clone()
                };
                self.api.base_url = candidate.base_url()?;
            }
            "api.timeout_secs" => {
                let secs: u64 = value.parse().map_err(|_| {
                    DeskError::Config(format!("timeout must be a whole number of seconds, got '{value}'"))
                })?;
                if secs == 0 {
                    return Err(DeskError::Config("timeout must be at least 1 second".to_string()));
                }
                self.api.timeout_secs = secs;
            }
            "list.page_size" => {
                let size: u32 = value.parse().map_err(|_| {
                    DeskError::Config(format!("page size must be a positive number, got '{value}'"))
                })?;
                if size == 0 {
                    return Err(DeskError::Config("page size must be at least 1".to_string()));
                }
                self.list.page_size = size;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> DeskError {
    DeskError::Config(format!(
        "unknown config key '{}', expected one of: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
