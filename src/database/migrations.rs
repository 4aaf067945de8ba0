//! Versioned schema for the storage file.
//!
//! Applied versions are recorded in `schema_version`; each step runs once.

use rusqlite::{params, Connection};

/// Bump together with a new entry in `MIGRATIONS`.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// `(version, description, sql)`, in ascending version order.
const MIGRATIONS: &[(i32, &str, &str)] = &[(
    1,
    "Key/value storage area",
    "CREATE TABLE IF NOT EXISTS storage_items (
         key TEXT PRIMARY KEY,
         value TEXT NOT NULL,
         updated_at INTEGER NOT NULL
     );
     CREATE INDEX IF NOT EXISTS idx_storage_items_updated_at ON storage_items(updated_at);",
)];

/// Highest applied version, 0 for a fresh file.
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Applies every migration newer than the file's version.
///
/// # Errors
/// Returns `rusqlite::Error` if any statement fails; the failing step is
/// rolled back and not recorded.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);
    for &(version, description, sql) in MIGRATIONS.iter().filter(|m| m.0 > current) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
            params![version, chrono::Utc::now().timestamp(), description],
        )?;
        tx.commit()?;
        tracing::info!(version, description, "storage schema migrated");
    }
    Ok(())
}
