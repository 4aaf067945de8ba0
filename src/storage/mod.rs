//! Storage areas and the JSON persistence adapter built on them.
//!
//! - [`StorageArea`]: trait for a string key/value store.
//! - [`MemoryStorageArea`]: in-process area, for tests and ephemeral runs.
//! - [`SqliteStorageArea`]: persistent area on a SQLite file.
//! - [`PersistentStore`]: typed JSON load/save that never fails the caller.

pub mod area;
pub mod memory;
pub mod sqlite;
pub mod store;

pub use area::StorageArea;
pub use memory::MemoryStorageArea;
pub use sqlite::SqliteStorageArea;
pub use store::PersistentStore;
