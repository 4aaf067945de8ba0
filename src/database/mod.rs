//! SQLite layer under [`SqliteStorageArea`](crate::storage::SqliteStorageArea).
//!
//! ```no_run
//! use blogsync::database::Database;
//!
//! let db = Database::open("storage.db").expect("failed to open storage file");
//! let keys: i64 = db
//!     .connection()
//!     .query_row("SELECT COUNT(*) FROM storage_items", [], |row| row.get(0))
//!     .expect("storage_items exists after migration");
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
