use thiserror::Error;

// === StorageError ===

/// Errors raised by a storage area or the persistent store adapter.
///
/// The bookmark path never hands these to its callers: they are logged and
/// contained. They stay public so storage areas can be tested directly.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage area is disabled or absent in this execution context.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    /// Writing would exceed the area's byte quota.
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),
    /// A value could not be serialized or parsed.
    #[error("Storage serialization error: {0}")]
    Serialization(String),
    /// The SQLite backend failed.
    #[error("Storage database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

// === VoteError ===

/// Errors related to comment vote requests.
#[derive(Debug, Error)]
pub enum VoteError {
    /// The request never reached the vote endpoint or the connection failed.
    #[error("Vote network error: {0}")]
    Network(String),
    /// The endpoint answered with a failure.
    #[error("Vote endpoint error: {0}")]
    Endpoint(String),
    /// The endpoint's response body could not be parsed.
    #[error("Vote response parse error: {0}")]
    Parse(String),
    /// No vote endpoint is configured.
    #[error("Vote endpoint not configured")]
    Unavailable,
}

impl From<reqwest::Error> for VoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            VoteError::Parse(e.to_string())
        } else if e.is_status() {
            VoteError::Endpoint(e.to_string())
        } else {
            VoteError::Network(e.to_string())
        }
    }
}

// === ConfigError ===

/// Errors related to loading or validating the sync configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Config I/O error: {0}")]
    Io(String),
    /// The config file is not valid JSON for `SyncConfig`.
    #[error("Config parse error: {0}")]
    Parse(String),
    /// A setting holds a value the engine cannot run with.
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}
