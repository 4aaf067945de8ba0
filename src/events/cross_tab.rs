//! Cross-tab storage change signal.
//!
//! A [`StorageOrigin`] is one storage area shared by every tab of a browser
//! origin. Each tab talks to it through its own [`TabStorage`]. When a tab
//! writes a key, listeners registered by the *other* tabs for that key get a
//! [`StorageEvent`]; the writing tab never hears its own write.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::subscription::Subscription;
use crate::storage::StorageArea;
use crate::types::errors::StorageError;

/// Notification that a key changed in another tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

pub type StorageCallback = Box<dyn Fn(&StorageEvent) + Send + Sync>;

/// Source of cross-tab change notifications for a storage key.
///
/// Hosts without one only sync within a tab.
pub trait CrossTabSignal: Send + Sync {
    fn subscribe_cross_tab(&self, key: &str, callback: StorageCallback) -> Subscription;
}

struct OriginListener {
    id: u64,
    tab: u64,
    key: String,
    callback: Arc<dyn Fn(&StorageEvent) + Send + Sync>,
}

struct OriginInner {
    area: Arc<dyn StorageArea>,
    listeners: Mutex<Vec<OriginListener>>,
    next_listener: AtomicU64,
    next_tab: AtomicU64,
}

impl OriginInner {
    fn listeners(&self) -> MutexGuard<'_, Vec<OriginListener>> {
        self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify_others(&self, writer: u64, event: StorageEvent) {
        let callbacks: Vec<_> = self
            .listeners()
            .iter()
            .filter(|l| l.tab != writer && l.key == event.key)
            .map(|l| Arc::clone(&l.callback))
            .collect();

        debug!(key = %event.key, writer, receivers = callbacks.len(), "cross-tab storage event");
        for callback in &callbacks {
            callback(&event);
        }
    }
}

/// A storage area shared by all tabs of one origin.
#[derive(Clone)]
pub struct StorageOrigin {
    inner: Arc<OriginInner>,
}

impl StorageOrigin {
    pub fn new(area: Arc<dyn StorageArea>) -> Self {
        Self {
            inner: Arc::new(OriginInner {
                area,
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
                next_tab: AtomicU64::new(1),
            }),
        }
    }

    /// Opens a new tab on this origin.
    pub fn open_tab(&self) -> TabStorage {
        let tab = self.inner.next_tab.fetch_add(1, Ordering::SeqCst);
        TabStorage {
            origin: Arc::clone(&self.inner),
            tab,
        }
    }

    /// The shared area, bypassing change notification.
    pub fn area(&self) -> Arc<dyn StorageArea> {
        Arc::clone(&self.inner.area)
    }

    /// Number of cross-tab listeners across all tabs.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners().len()
    }
}

/// One tab's handle on a [`StorageOrigin`].
#[derive(Clone)]
pub struct TabStorage {
    origin: Arc<OriginInner>,
    tab: u64,
}

impl TabStorage {
    pub fn tab_id(&self) -> u64 {
        self.tab
    }
}

impl StorageArea for TabStorage {
    fn is_available(&self) -> bool {
        self.origin.area.is_available()
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.origin.area.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let old_value = self.origin.area.get_item(key).ok().flatten();
        self.origin.area.set_item(key, value)?;
        if old_value.as_deref() != Some(value) {
            self.origin.notify_others(
                self.tab,
                StorageEvent {
                    key: key.to_string(),
                    old_value,
                    new_value: Some(value.to_string()),
                },
            );
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let old_value = self.origin.area.get_item(key).ok().flatten();
        self.origin.area.remove_item(key)?;
        if old_value.is_some() {
            self.origin.notify_others(
                self.tab,
                StorageEvent {
                    key: key.to_string(),
                    old_value,
                    new_value: None,
                },
            );
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.origin.area.keys()
    }
}

impl CrossTabSignal for TabStorage {
    fn subscribe_cross_tab(&self, key: &str, callback: StorageCallback) -> Subscription {
        let id = self.origin.next_listener.fetch_add(1, Ordering::SeqCst);
        self.origin.listeners().push(OriginListener {
            id,
            tab: self.tab,
            key: key.to_string(),
            callback: Arc::from(callback),
        });

        let origin = Arc::downgrade(&self.origin);
        Subscription::new(move || {
            if let Some(origin) = origin.upgrade() {
                origin.listeners().retain(|l| l.id != id);
            }
        })
    }
}
