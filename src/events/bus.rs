//! Same-tab publish/subscribe keyed by event name.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::trace;

use super::subscription::Subscription;

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listener<T> {
    id: u64,
    name: String,
    handler: Handler<T>,
}

struct Registry<T> {
    next_id: u64,
    listeners: Vec<Listener<T>>,
}

/// Synchronous in-process event dispatcher.
///
/// Handlers run on the publishing thread, in subscription order, before
/// `publish` returns. The registry lock is released before handlers run, so a
/// handler may publish, subscribe or read storage.
pub struct EventBus<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T: 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> EventBus<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    fn lock(registry: &Mutex<Registry<T>>) -> MutexGuard<'_, Registry<T>> {
        registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers `handler` for events published under `name`.
    pub fn subscribe<F>(&self, name: &str, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut registry = Self::lock(&self.registry);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push(Listener {
                id,
                name: name.to_string(),
                handler: Arc::new(handler),
            });
            id
        };
        trace!(event = name, id, "listener subscribed");

        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                Self::lock(&registry).listeners.retain(|l| l.id != id);
            }
        })
    }

    /// Delivers `detail` to every listener of `name`. Returns how many ran.
    pub fn publish(&self, name: &str, detail: &T) -> usize {
        let handlers: Vec<Handler<T>> = Self::lock(&self.registry)
            .listeners
            .iter()
            .filter(|l| l.name == name)
            .map(|l| Arc::clone(&l.handler))
            .collect();

        trace!(event = name, listeners = handlers.len(), "publishing");
        for handler in &handlers {
            handler(detail);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        Self::lock(&self.registry)
            .listeners
            .iter()
            .filter(|l| l.name == name)
            .count()
    }
}
