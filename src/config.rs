//! Engine configuration.
//!
//! Resolved in three layers: built-in defaults, an optional JSON file, then
//! `BLOGSYNC_*` environment variables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::events::{BOOKMARK_CHANGED, COMMENT_VOTE_CHANGED, COOKIE_CONSENT_CHANGED};
use crate::platform;
use crate::types::errors::ConfigError;

pub const ENV_DATA_DIR: &str = "BLOGSYNC_DATA_DIR";
pub const ENV_STORAGE_KEY: &str = "BLOGSYNC_STORAGE_KEY";
pub const ENV_VOTE_ENDPOINT: &str = "BLOGSYNC_VOTE_ENDPOINT";
pub const ENV_STORAGE_QUOTA: &str = "BLOGSYNC_STORAGE_QUOTA";

/// Name of the storage file inside `data_dir`.
pub const STORAGE_FILE_NAME: &str = "storage.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Storage key holding the bookmark collection.
    pub storage_key: String,
    /// Event name published on bookmark changes.
    pub change_event: String,
    /// Storage key holding the cookie-consent decision.
    pub consent_key: String,
    pub consent_event: String,
    pub vote_event: String,
    /// Where the persistent storage file lives. `None` keeps storage in memory.
    pub data_dir: Option<PathBuf>,
    /// Base URL of the comment vote handlers, e.g. `https://blog.example/api`.
    pub vote_endpoint: Option<String>,
    pub storage_quota_bytes: Option<usize>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            storage_key: "bookmarks_v1".to_string(),
            change_event: BOOKMARK_CHANGED.to_string(),
            consent_key: "cookie_consent_v1".to_string(),
            consent_event: COOKIE_CONSENT_CHANGED.to_string(),
            vote_event: COMMENT_VOTE_CHANGED.to_string(),
            data_dir: None,
            vote_endpoint: None,
            storage_quota_bytes: None,
        }
    }
}

impl SyncConfig {
    /// Path of the config file used when none is given.
    pub fn default_path() -> PathBuf {
        platform::default_config_dir().join("config.json")
    }

    /// Loads the config file at `path` (or [`default_path`](Self::default_path)).
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// `Io` if the file exists but cannot be read, `Parse` if it is not valid JSON.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: SyncConfig = serde_json::from_str(&content)?;
        info!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Applies `BLOGSYNC_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, keyed by the `BLOGSYNC_*` variable names.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            info!("{ENV_DATA_DIR} set, storing data in {dir}");
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(key) = lookup(ENV_STORAGE_KEY) {
            info!("{ENV_STORAGE_KEY} set, using storage key {key}");
            self.storage_key = key;
        }
        if let Some(endpoint) = lookup(ENV_VOTE_ENDPOINT) {
            let endpoint = endpoint.trim().trim_end_matches('/').to_string();
            self.vote_endpoint = if endpoint.is_empty() { None } else { Some(endpoint) };
        }
        if let Some(quota) = lookup(ENV_STORAGE_QUOTA) {
            match quota.trim().parse::<usize>() {
                Ok(bytes) => self.storage_quota_bytes = Some(bytes),
                Err(e) => warn!("Invalid {ENV_STORAGE_QUOTA} value {quota:?}: {e}"),
            }
        }
    }

    /// Checks that every key and event name is usable.
    ///
    /// # Errors
    /// `InvalidValue` naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("storage_key", &self.storage_key),
            ("change_event", &self.change_event),
            ("consent_key", &self.consent_key),
            ("consent_event", &self.consent_event),
            ("vote_event", &self.vote_event),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!("{} must not be empty", field)));
            }
        }
        if self.storage_key == self.consent_key {
            return Err(ConfigError::InvalidValue(
                "storage_key and consent_key must differ".to_string(),
            ));
        }
        if let Some(endpoint) = &self.vote_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::InvalidValue(format!(
                    "vote_endpoint must be an http(s) URL: {}",
                    endpoint
                )));
            }
        }
        Ok(())
    }

    /// Path of the SQLite storage file, if storage is persistent.
    pub fn storage_file(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(STORAGE_FILE_NAME))
    }
}
