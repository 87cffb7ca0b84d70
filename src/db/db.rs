//! SQLite connection setup.
//!
//! Every connection is brought to the latest schema by
//! [`init_with_migrations`] before it is handed out.
//!
//! ## Features
//!
//! - **Default location**: `arealog.db` in the [`DataStorage`] directory
//! - **Explicit paths**: parent directories are created on demand
//! - **Busy timeout**: concurrent invocations wait for each other's write
//!   transactions instead of failing immediately
//! - **In-memory databases** for tests and throwaway hosts
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arealog::db::db::Db;
//!
//! let db = Db::open("/tmp/arealog.db")?;
//! let count: i64 = db.conn.query_row("SELECT COUNT(*) FROM log_entries", [], |row| row.get(0))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::db::migrations::init_with_migrations;
use crate::libs::config::DB_FILE_NAME;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::{Result, TrackerError};
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// How long a connection waits for another process's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// An open, migrated SQLite connection.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database in the default data directory.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new()
            .get_path(DB_FILE_NAME)
            .map_err(|e| TrackerError::Storage(e.to_string()))?;
        Self::open(db_file_path)
    }

    /// Opens (or creates) the database at `path` and brings its schema up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        init_with_migrations(&mut conn)?;
        debug!(path = %path.display(), "database opened");

        Ok(Db { conn })
    }

    /// Private in-memory database, used by tests and throwaway hosts.
    pub fn in_memory() -> Result<Db> {
        let mut conn = Connection::open_in_memory()?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }
}
