//! The key/value storage area the engine persists into.
//!
//! A `StorageArea` plays the role a browser's local storage plays for the web
//! frontend: string keys, string values, shared by everything in one origin,
//! and possibly switched off at any moment.

use crate::types::errors::StorageError;

/// A string key/value store with availability that can change between calls.
pub trait StorageArea: Send + Sync {
    /// Whether the area can currently be read and written.
    fn is_available(&self) -> bool;
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    /// Lists stored keys in ascending order.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Checks that writing `value` under `key` keeps `used` bytes within `quota`.
///
/// `used` must already exclude the bytes of any value being replaced.
pub(crate) fn check_quota(
    quota: Option<usize>,
    used: usize,
    key: &str,
    value: &str,
) -> Result<(), StorageError> {
    if let Some(limit) = quota {
        let needed = used + key.len() + value.len();
        if needed > limit {
            return Err(StorageError::QuotaExceeded(format!(
                "writing '{}' needs {} bytes, quota is {}",
                key, needed, limit
            )));
        }
    }
    Ok(())
}
