//! In-process storage area.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::area::{check_quota, StorageArea};
use crate::types::errors::StorageError;

/// Storage area held in memory, with a switch to simulate disabled storage
/// and an optional byte quota.
#[derive(Default)]
pub struct MemoryStorageArea {
    items: Mutex<BTreeMap<String, String>>,
    disabled: AtomicBool,
    quota: Option<usize>,
}

impl MemoryStorageArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an area that rejects writes once keys plus values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Turns the area on or off, like a browser entering or leaving a
    /// storage-blocking privacy mode.
    pub fn set_available(&self, available: bool) {
        self.disabled.store(!available, Ordering::SeqCst);
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        if !self.is_available() {
            return Err(StorageError::Unavailable("memory storage disabled".to_string()));
        }
        self.items
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("memory storage lock poisoned: {}", e)))
    }
}

impl StorageArea for MemoryStorageArea {
    fn is_available(&self) -> bool {
        !self.disabled.load(Ordering::SeqCst)
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.guard()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.guard()?;
        let used: usize = items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        check_quota(self.quota, used, key, value)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.guard()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.guard()?.keys().cloned().collect())
    }
}
