//! Sync Coordinator for blogsync.
//!
//! Keeps a derived view of persisted state current for one consumer. Opening
//! a handle reads storage once, then listens to the same-tab event bus and to
//! the cross-tab storage signal; any notification triggers a full re-read and
//! re-projection. Concurrent writers resolve as last write wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::events::{CrossTabSignal, EventBus, StorageEvent, Subscription};
use crate::managers::bookmark_manager::BookmarkManager;
use crate::services::view_engine;
use crate::types::bookmark::BookmarkRecord;
use crate::types::events::SyncEvent;
use crate::types::view::{BookmarkView, ViewQuery};

/// Lifecycle of a [`SyncHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Listening,
}

struct SharedView<V> {
    view: Mutex<V>,
    refreshes: AtomicU64,
}

impl<V> SharedView<V> {
    fn view(&self) -> MutexGuard<'_, V> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A live view. Listeners are released by [`close`](Self::close) or on drop.
pub struct SyncHandle<V> {
    shared: Arc<SharedView<V>>,
    subscriptions: Vec<Subscription>,
    state: SyncState,
}

impl<V: Clone> SyncHandle<V> {
    /// Snapshot of the latest projection.
    pub fn current_view(&self) -> V {
        self.shared.view().clone()
    }
}

impl<V> SyncHandle<V> {
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Number of reconciliations so far, the initial read included.
    pub fn refresh_count(&self) -> u64 {
        self.shared.refreshes.load(Ordering::SeqCst)
    }

    /// Reserved for multi-writer conflict detection. Writes currently resolve
    /// as last write wins, so there is never anything to report.
    pub fn has_conflicts(&self) -> bool {
        false
    }

    /// Stops listening. The last view stays readable. Safe to call twice.
    pub fn close(&mut self) {
        if self.state == SyncState::Idle {
            return;
        }
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.state = SyncState::Idle;
        debug!("sync handle closed");
    }
}

impl<V> Drop for SyncHandle<V> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens live views over the bookmark collection (or any persisted key).
#[derive(Clone)]
pub struct SyncCoordinator {
    manager: BookmarkManager,
    bus: EventBus<SyncEvent>,
    cross_tab: Option<Arc<dyn CrossTabSignal>>,
}

impl SyncCoordinator {
    /// `cross_tab` is `None` on hosts without a cross-tab signal; views then
    /// only follow changes made in this tab.
    pub fn new(
        manager: BookmarkManager,
        bus: EventBus<SyncEvent>,
        cross_tab: Option<Arc<dyn CrossTabSignal>>,
    ) -> Self {
        Self {
            manager,
            bus,
            cross_tab,
        }
    }

    /// Watches storage `key`, re-running `read` whenever `event` is published
    /// in this tab or another tab writes `key`.
    pub fn watch<V, F>(&self, event: &str, key: &str, read: F) -> SyncHandle<V>
    where
        V: Send + 'static,
        F: Fn() -> V + Send + Sync + 'static,
    {
        let shared = Arc::new(SharedView {
            view: Mutex::new(read()),
            refreshes: AtomicU64::new(1),
        });

        let refresh: Arc<dyn Fn() + Send + Sync> = {
            let shared = Arc::clone(&shared);
            Arc::new(move || {
                let next = read();
                *shared.view() = next;
                shared.refreshes.fetch_add(1, Ordering::SeqCst);
            })
        };

        // Guards collected so far are released if a later registration unwinds.
        let mut subscriptions = Vec::with_capacity(2);
        {
            let refresh = Arc::clone(&refresh);
            subscriptions.push(self.bus.subscribe(event, move |_| refresh()));
        }
        if let Some(signal) = &self.cross_tab {
            let refresh = Arc::clone(&refresh);
            subscriptions.push(signal.subscribe_cross_tab(key, Box::new(move |_: &StorageEvent| refresh())));
        }

        debug!(event, key, cross_tab = self.cross_tab.is_some(), "sync handle listening");
        SyncHandle {
            shared,
            subscriptions,
            state: SyncState::Listening,
        }
    }

    /// Live projection of the bookmark collection.
    pub fn open<V, F>(&self, projection: F) -> SyncHandle<V>
    where
        V: Send + 'static,
        F: Fn(&[BookmarkRecord]) -> V + Send + Sync + 'static,
    {
        let manager = self.manager.clone();
        self.watch(
            self.manager.change_event(),
            self.manager.storage_key(),
            move || projection(&manager.load()),
        )
    }

    /// Live filtered, searched and sorted list.
    pub fn open_view(&self, query: ViewQuery) -> SyncHandle<BookmarkView> {
        self.open(move |records| view_engine::project(records, &query))
    }

    /// Live bookmark count, for badges.
    pub fn open_count(&self) -> SyncHandle<usize> {
        self.open(|records| records.len())
    }

    /// Live "is this post bookmarked" flag.
    pub fn open_membership(&self, id: &str) -> SyncHandle<bool> {
        let id = id.to_string();
        self.open(move |records| records.iter().any(|r| r.id == id))
    }
}
