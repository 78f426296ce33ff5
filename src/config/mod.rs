//! Configuration and on-disk locations

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Server URL used by `aw-server --testing`.
pub const TESTING_SERVER_URL: &str = "http://127.0.0.1:5666";
/// Server URL used by a production `aw-server`.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5600";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CLIENT_NAME: &str = "aw-dashboard";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit server URL. Falls back to `AW_SERVER_URL`, then the mode default.
    pub server_url: Option<String>,
    /// Talk to a testing server (port 5666) instead of production
    pub testing: bool,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Client name reported to the server
    pub client_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: None,
            testing: false,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
        }
    }
}

impl Config {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("net", "activitywatch", "aw-dashboard")
            .context("Could not determine config directory")
    }

    /// Get config file path
    fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory backing local storage (session, landing page)
    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Apply `--server` and `--testing` for one run. `--server` wins; a bare
    /// `--testing` pins the testing server over any saved or env URL.
    pub fn with_overrides(mut self, server: Option<String>, testing: bool) -> Self {
        if testing {
            self.testing = true;
        }
        match server {
            Some(url) => self.server_url = Some(url),
            None if testing => self.server_url = Some(TESTING_SERVER_URL.to_string()),
            None => {}
        }
        self
    }

    /// Resolve the server origin: explicit setting, then `AW_SERVER_URL`, then mode default.
    pub fn server_origin(&self) -> String {
        let env_url = std::env::var("AW_SERVER_URL").ok();
        self.origin_with_env(env_url.as_deref())
    }

    fn origin_with_env(&self, env_url: Option<&str>) -> String {
        let not_blank = |s: &&str| !s.trim().is_empty();
        let chosen = self
            .server_url
            .as_deref()
            .filter(not_blank)
            .or(env_url.filter(not_blank));
        match chosen {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.testing => TESTING_SERVER_URL.to_string(),
            None => DEFAULT_SERVER_URL.to_string(),
        }
    }
}
