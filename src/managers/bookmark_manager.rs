//! Bookmark Manager for blogsync.
//!
//! Implements `BookmarkManagerTrait`: add, remove, toggle and clear over the
//! persisted bookmark collection, plus snapshot queries. Every operation
//! re-reads storage, so tabs sharing an origin always act on the latest
//! write. Storage failures are logged and contained; callers get the best
//! collection known in memory and never an error.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::events::EventBus;
use crate::storage::PersistentStore;
use crate::types::bookmark::{BookmarkRecord, Category, Post};
use crate::types::events::{BookmarkChange, ChangeKind, SyncEvent};

/// Trait defining bookmark collection operations.
pub trait BookmarkManagerTrait {
    fn add(&self, post: &Post) -> Vec<BookmarkRecord>;
    fn remove(&self, id: &str) -> Vec<BookmarkRecord>;
    fn toggle(&self, post: &Post) -> bool;
    fn clear(&self);
    fn is_member(&self, id: &str) -> bool;
    fn list(&self) -> Vec<BookmarkRecord>;
    fn get(&self, id: &str) -> Option<BookmarkRecord>;
    fn count(&self) -> usize;
    fn categories(&self) -> Vec<Category>;
}

/// Bookmark manager over a persistent store, announcing changes on an event bus.
#[derive(Clone)]
pub struct BookmarkManager {
    store: PersistentStore,
    bus: EventBus<SyncEvent>,
    storage_key: String,
    change_event: String,
    clock: fn() -> DateTime<Utc>,
}

impl BookmarkManager {
    /// Creates a manager using the storage key and event name from `config`.
    pub fn new(store: PersistentStore, bus: EventBus<SyncEvent>, config: &SyncConfig) -> Self {
        Self {
            store,
            bus,
            storage_key: config.storage_key.clone(),
            change_event: config.change_event.clone(),
            clock: Utc::now,
        }
    }

    /// Replaces the time source used for `bookmarkedAt`.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn change_event(&self) -> &str {
        &self.change_event
    }

    pub fn store(&self) -> &PersistentStore {
        &self.store
    }

    /// Reads the persisted collection, restoring the one-record-per-id invariant.
    ///
    /// Legacy data may hold duplicates; the first (newest) copy wins.
    pub fn load(&self) -> Vec<BookmarkRecord> {
        let mut seen = HashSet::new();
        self.store
            .load_list::<BookmarkRecord>(&self.storage_key)
            .into_iter()
            .filter(|r| !r.id.is_empty() && seen.insert(r.id.clone()))
            .collect()
    }

    fn now(&self) -> String {
        (self.clock)().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn persist_and_publish(&self, records: &[BookmarkRecord], change: BookmarkChange) {
        if !self.store.save(&self.storage_key, records) {
            return;
        }
        debug!(kind = ?change.kind, size = records.len(), "bookmark collection changed");
        self.bus.publish(&self.change_event, &SyncEvent::Bookmark(change));
    }
}

impl BookmarkManagerTrait for BookmarkManager {
    /// Bookmarks `post`, newest first. Adding an id already present is a no-op.
    fn add(&self, post: &Post) -> Vec<BookmarkRecord> {
        if !self.store.is_available() {
            debug!(id = %post.id, "storage unavailable, bookmark not added");
            return Vec::new();
        }
        if post.id.is_empty() {
            warn!("ignoring bookmark for a post without an id");
            return self.load();
        }

        let mut records = self.load();
        if records.iter().any(|r| r.id == post.id) {
            return records;
        }

        let record = BookmarkRecord::snapshot(post, self.now());
        records.insert(0, record.clone());
        self.persist_and_publish(
            &records,
            BookmarkChange {
                kind: ChangeKind::Add,
                post: Some(record),
            },
        );
        records
    }

    /// Removes the bookmark with `id`. Nothing is published when it was absent.
    fn remove(&self, id: &str) -> Vec<BookmarkRecord> {
        if !self.store.is_available() {
            debug!(id, "storage unavailable, bookmark not removed");
            return Vec::new();
        }

        let mut records = self.load();
        let Some(index) = records.iter().position(|r| r.id == id) else {
            return records;
        };

        let removed = records.remove(index);
        self.persist_and_publish(
            &records,
            BookmarkChange {
                kind: ChangeKind::Remove,
                post: Some(removed),
            },
        );
        records
    }

    /// Flips membership of `post` and returns whether it is now bookmarked.
    ///
    /// Membership is read fresh from storage on every call. Without storage,
    /// or for a post without an id, nothing changes and the result is `false`.
    fn toggle(&self, post: &Post) -> bool {
        if !self.store.is_available() || post.id.is_empty() {
            debug!(id = %post.id, "bookmark toggle skipped");
            return false;
        }
        if self.is_member(&post.id) {
            self.remove(&post.id);
            false
        } else {
            self.add(post);
            // A write that did not land leaves the post out.
            self.is_member(&post.id)
        }
    }

    /// Removes every bookmark.
    fn clear(&self) {
        if !self.store.is_available() {
            debug!("storage unavailable, bookmarks not cleared");
            return;
        }
        self.persist_and_publish(
            &[],
            BookmarkChange {
                kind: ChangeKind::Clear,
                post: None,
            },
        );
    }

    fn is_member(&self, id: &str) -> bool {
        self.load().iter().any(|r| r.id == id)
    }

    fn list(&self) -> Vec<BookmarkRecord> {
        self.load()
    }

    fn get(&self, id: &str) -> Option<BookmarkRecord> {
        self.load().into_iter().find(|r| r.id == id)
    }

    fn count(&self) -> usize {
        self.load().len()
    }

    /// Distinct categories across the collection, in order of first appearance.
    fn categories(&self) -> Vec<Category> {
        crate::services::view_engine::categories(&self.load())
    }
}
