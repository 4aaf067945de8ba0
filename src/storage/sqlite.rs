//! SQLite-backed persistent storage area.
//!
//! Values live in the `storage_items` table created by
//! [`migrations`](crate::database::migrations).

use rusqlite::{params, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::area::{check_quota, StorageArea};
use crate::database::Database;
use crate::types::errors::StorageError;

/// Storage area persisted to a SQLite file, surviving process restarts.
pub struct SqliteStorageArea {
    db: Mutex<Database>,
    disabled: AtomicBool,
    quota: Option<usize>,
}

impl SqliteStorageArea {
    /// Opens (or creates) the storage file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self::from_database(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    pub fn from_database(db: Database) -> Self {
        Self {
            db: Mutex::new(db),
            disabled: AtomicBool::new(false),
            quota: None,
        }
    }

    /// Limits keys plus values to `bytes` in total.
    pub fn with_quota(mut self, bytes: Option<usize>) -> Self {
        self.quota = bytes;
        self
    }

    pub fn set_available(&self, available: bool) {
        self.disabled.store(!available, Ordering::SeqCst);
    }

    fn guard(&self) -> Result<MutexGuard<'_, Database>, StorageError> {
        if !self.is_available() {
            return Err(StorageError::Unavailable("sqlite storage disabled".to_string()));
        }
        self.db
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("sqlite storage lock poisoned: {}", e)))
    }
}

impl StorageArea for SqliteStorageArea {
    fn is_available(&self) -> bool {
        !self.disabled.load(Ordering::SeqCst)
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let db = self.guard()?;
        let value = db
            .connection()
            .query_row(
                "SELECT value FROM storage_items WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let db = self.guard()?;
        let conn = db.connection();

        if self.quota.is_some() {
            let used: i64 = conn.query_row(
                "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0) \
                 FROM storage_items WHERE key != ?1",
                params![key],
                |row| row.get(0),
            )?;
            check_quota(self.quota, used.max(0) as usize, key, value)?;
        }

        conn.execute(
            "INSERT INTO storage_items (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let db = self.guard()?;
        db.connection()
            .execute("DELETE FROM storage_items WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let db = self.guard()?;
        let mut stmt = db
            .connection()
            .prepare("SELECT key FROM storage_items ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}
