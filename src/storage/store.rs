//! JSON persistence over a [`StorageArea`], with failure containment.
//!
//! Nothing here returns an error to the bookmark path: reads fall back to
//! empty defaults and failed writes are logged and reported as `false`.
//! Availability is re-checked on every access.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::area::StorageArea;
use crate::types::errors::StorageError;

/// Typed JSON view of a storage area.
#[derive(Clone)]
pub struct PersistentStore {
    area: Arc<dyn StorageArea>,
}

impl PersistentStore {
    pub fn new(area: Arc<dyn StorageArea>) -> Self {
        Self { area }
    }

    pub fn is_available(&self) -> bool {
        self.area.is_available()
    }

    /// Reads the raw string under `key`, or `None` when absent or unreadable.
    pub fn read_raw(&self, key: &str) -> Option<String> {
        if !self.area.is_available() {
            debug!(key, "storage unavailable, reading nothing");
            return None;
        }
        match self.area.get_item(key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "storage read failed");
                None
            }
        }
    }

    /// Loads and parses the value under `key`.
    ///
    /// Absent, unreadable or malformed values yield `T::default()`. A
    /// malformed value is left in storage untouched.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(raw) = self.read_raw(key) else {
            return T::default();
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "malformed persisted data, using empty default");
                T::default()
            }
        }
    }

    /// Loads a JSON array under `key`, keeping the elements that parse as `T`.
    ///
    /// A value that is not JSON, or not an array, loads as empty. Elements
    /// with the wrong shape are dropped one by one.
    pub fn load_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(raw) = self.read_raw(key) else {
            return Vec::new();
        };
        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(other) => {
                warn!(key, kind = json_kind(&other), "persisted value is not a list, using empty list");
                return Vec::new();
            }
            Err(e) => {
                warn!(key, error = %e, "malformed persisted data, using empty list");
                return Vec::new();
            }
        };

        let total = items.len();
        let parsed: Vec<T> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if parsed.len() != total {
            debug!(key, dropped = total - parsed.len(), "dropped persisted entries with an unknown shape");
        }
        parsed
    }

    /// Serializes and writes `value` under `key`.
    ///
    /// # Errors
    /// Returns the storage area's error, or `Serialization` if `value` cannot be encoded.
    pub fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        if !self.area.is_available() {
            return Err(StorageError::Unavailable(format!("cannot write '{}'", key)));
        }
        let raw = serde_json::to_string(value)?;
        self.area.set_item(key, &raw)
    }

    /// Writes `value` under `key`, logging instead of failing.
    ///
    /// Returns whether the write landed. Callers keep their in-memory state
    /// either way, so memory and storage may disagree until the next
    /// successful write.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.try_save(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "storage write failed, change kept in memory only");
                false
            }
        }
    }

    /// Deletes `key`, logging instead of failing. Returns whether it succeeded.
    pub fn remove(&self, key: &str) -> bool {
        if !self.area.is_available() {
            return false;
        }
        match self.area.remove_item(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "storage delete failed");
                false
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
