//! Local device storage
//!
//! A small key/value store holding one JSON document per key, the terminal
//! counterpart of a browser's `localStorage`. Values may contain session
//! tokens, so files are created owner-readable only.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Session state written by the user store
pub const USER_KEY: &str = "user";
/// Path the router redirects `/` to when set
pub const LANDING_PAGE_KEY: &str = "landingpage";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// Storage rooted at the given directory (created lazily on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage in the application data directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::config::Config::data_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    /// Raw string value for `key`, `None` if never set.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.item_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read storage key '{}'", key)),
        }
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create storage directory")?;
        let path = self.item_path(key);
        fs::write(&path, value).with_context(|| format!("Failed to write storage key '{}'", key))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&path, perms).context("Failed to set storage permissions")?;
        }

        Ok(())
    }

    /// Remove `key`; removing a missing key is not an error.
    pub fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.item_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove storage key '{}'", key)),
        }
    }

    /// Decode a JSON value. Unparsable content is logged and treated as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_item(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring corrupt storage key '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).context("Failed to serialize storage value")?;
        self.set_item(key, &raw)
    }

    /// Stored landing page, if any. Stored as a plain path string.
    pub fn landing_page(&self) -> Option<String> {
        match self.get_item(LANDING_PAGE_KEY) {
            Ok(Some(page)) => {
                let page = page.trim().trim_matches('"').to_string();
                (!page.is_empty()).then_some(page)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Could not read landing page: {:#}", e);
                None
            }
        }
    }
}
