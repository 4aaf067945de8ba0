//! Application root for blogsync.
//!
//! One `App` is one tab: it owns this tab's view of the shared storage
//! origin, its event bus, and every manager and service wired to them.
//! Construct it once at the root and hand references to consumers.

use std::sync::Arc;
use tracing::info;

use crate::config::SyncConfig;
use crate::events::{CrossTabSignal, EventBus, StorageOrigin, TabStorage};
use crate::managers::bookmark_manager::BookmarkManager;
use crate::services::consent_manager::ConsentManager;
use crate::services::sync_coordinator::SyncCoordinator;
use crate::services::vote_tracker::{HttpVoteEndpoint, VoteTracker};
use crate::storage::{MemoryStorageArea, PersistentStore, SqliteStorageArea, StorageArea};
use crate::types::events::SyncEvent;

/// One tab's fully wired engine.
pub struct App {
    pub config: SyncConfig,
    pub origin: StorageOrigin,
    pub tab: TabStorage,
    pub bus: EventBus<SyncEvent>,
    pub bookmarks: BookmarkManager,
    pub coordinator: SyncCoordinator,
    pub consent: ConsentManager,
    /// Present when `vote_endpoint` is configured.
    pub votes: Option<VoteTracker<HttpVoteEndpoint>>,
}

impl App {
    /// Creates the storage origin described by `config` and opens the first tab on it.
    ///
    /// Storage is a SQLite file under `data_dir`, or memory when no data dir is set.
    pub fn new(config: SyncConfig) -> Result<Self, Box<dyn std::error::Error>> {
        config.validate()?;

        let area: Arc<dyn StorageArea> = match config.storage_file() {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                info!(path = %path.display(), "opening persistent storage");
                Arc::new(SqliteStorageArea::open(&path)?.with_quota(config.storage_quota_bytes))
            }
            None => {
                info!("no data dir configured, storage is in memory");
                Arc::new(match config.storage_quota_bytes {
                    Some(bytes) => MemoryStorageArea::with_quota(bytes),
                    None => MemoryStorageArea::new(),
                })
            }
        };

        Ok(Self::on_origin(config, StorageOrigin::new(area)))
    }

    /// Opens a new tab on an existing origin.
    pub fn on_origin(config: SyncConfig, origin: StorageOrigin) -> Self {
        let tab = origin.open_tab();
        let bus = EventBus::new();
        let store = PersistentStore::new(Arc::new(tab.clone()));

        let bookmarks = BookmarkManager::new(store.clone(), bus.clone(), &config);
        let signal: Arc<dyn CrossTabSignal> = Arc::new(tab.clone());
        let coordinator = SyncCoordinator::new(bookmarks.clone(), bus.clone(), Some(signal));
        let consent = ConsentManager::new(store, bus.clone(), &config);
        let votes = config
            .vote_endpoint
            .as_deref()
            .map(|base| VoteTracker::new(HttpVoteEndpoint::new(base), bus.clone(), &config.vote_event));

        Self {
            config,
            origin,
            tab,
            bus,
            bookmarks,
            coordinator,
            consent,
            votes,
        }
    }

    /// Opens another tab sharing this app's storage origin.
    pub fn attach_tab(&self) -> App {
        Self::on_origin(self.config.clone(), self.origin.clone())
    }
}
