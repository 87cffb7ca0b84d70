//! SQLite implementation of [`LogStore`].
//!
//! Persists one row per closed area interval in the `log_entries` table and
//! reads them back per owner and date range for reporting.
//!
//! ## Features
//!
//! - **Append-only writes**: every recorded interval becomes one new row
//! - **Range queries**: rows of one owner whose `entry_time` lies in an inclusive range
//! - **Row validation**: rows that break the entry invariants come back as
//!   [`MalformedRecord`]s keyed by their rowid instead of failing the query
//! - **Bulk deletion**: per owner or for every owner
//!
//! Timestamps are stored as fixed-width text (`YYYY-MM-DD HH:MM:SS.ffffff`),
//! so range filters compare them lexicographically and use the
//! `(owner_id, entry_time)` index.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arealog::db::log_entries::LogEntries;
//! use arealog::libs::store::{end_of_day, start_of_day, LogStore};
//! use chrono::Local;
//!
//! let entries = LogEntries::open("/tmp/arealog.db")?;
//! let today = Local::now().date_naive();
//! let rows = entries.query_log_entries("alice", start_of_day(today), end_of_day(today))?;
//! # Ok::<(), arealog::libs::error::TrackerError>(())
//! ```

use crate::db::db::Db;
use crate::libs::error::{MalformedRecord, Result};
use crate::libs::store::{format_timestamp, parse_timestamp, EntryId, LogEntry, LogStore, RowResult};
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Arc;

/// Insert one closed interval.
///
/// Both timestamps are written with [`format_timestamp`] so that they sort
/// and compare as text.
const INSERT_LOG_ENTRY: &str = "INSERT INTO log_entries (owner_id, area_name, department_code, entry_time, exit_time, duration_seconds)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
/// Select the rows of one owner whose entry time lies in `[?2, ?3]`.
///
/// The rowid is selected first so that a row which fails to decode can be
/// reported by id.
const SELECT_LOG_ENTRIES: &str = "SELECT id, owner_id, area_name, department_code, entry_time, exit_time, duration_seconds
    FROM log_entries WHERE owner_id = ?1 AND entry_time >= ?2 AND entry_time <= ?3";
/// Delete every row of one owner. Only reachable through the gated `clear` command.
const DELETE_OWNER_LOG_ENTRIES: &str = "DELETE FROM log_entries WHERE owner_id = ?1";
/// Delete every row of every owner.
const DELETE_ALL_LOG_ENTRIES: &str = "DELETE FROM log_entries";

/// SQLite log store.
///
/// The connection is shared with [`Sessions`](crate::db::sessions::Sessions)
/// so that recording an interval and saving the timer state can run in one
/// transaction.
pub struct LogEntries {
    pub conn: Arc<Mutex<Connection>>,
}

impl LogEntries {
    /// Store backed by the database in the default data directory.
    pub fn new() -> Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn from_db(db: Db) -> Self {
        Self {
            conn: Arc::new(Mutex::new(db.conn)),
        }
    }

    /// Shared handle for other tables in the same database.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }
}

impl LogStore for LogEntries {
    fn append_log_entry(&self, entry: &LogEntry) -> Result<EntryId> {
        let conn = self.conn.lock();
        conn.execute(
            INSERT_LOG_ENTRY,
            params![
                entry.owner_id,
                entry.area_name,
                entry.department_code,
                format_timestamp(&entry.entry_time),
                format_timestamp(&entry.exit_time),
                entry.duration_seconds,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn query_log_entries(&self, owner_id: &str, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<RowResult>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_LOG_ENTRIES)?;
        let rows = stmt
            .query_map(params![owner_id, format_timestamp(&from), format_timestamp(&to)], |row| {
                let id: i64 = row.get(0)?;
                Ok(decode_row(id, row))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn delete_log_entries(&self, owner_id: &str) -> Result<usize> {
        Ok(self.conn.lock().execute(DELETE_OWNER_LOG_ENTRIES, params![owner_id])?)
    }

    fn delete_all_log_entries(&self) -> Result<usize> {
        Ok(self.conn.lock().execute(DELETE_ALL_LOG_ENTRIES, [])?)
    }
}

/// Decodes one selected row. Missing or unparseable columns and entries that
/// break the [`LogEntry`] invariants become a [`MalformedRecord`].
fn decode_row(id: i64, row: &Row) -> RowResult {
    let text = |index: usize, name: &str| -> std::result::Result<String, MalformedRecord> {
        row.get::<_, Option<String>>(index)
            .ok()
            .flatten()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| MalformedRecord::new(id, format!("missing {}", name)))
    };
    let timestamp = |index: usize, name: &str| -> std::result::Result<NaiveDateTime, MalformedRecord> {
        let value = text(index, name)?;
        parse_timestamp(&value).ok_or_else(|| MalformedRecord::new(id, format!("invalid {}: {}", name, value)))
    };

    let duration_seconds = row
        .get::<_, Option<f64>>(6)
        .ok()
        .flatten()
        .ok_or_else(|| MalformedRecord::new(id, "missing or invalid duration_seconds"))?;

    LogEntry {
        owner_id: text(1, "owner_id")?,
        area_name: text(2, "area_name")?,
        department_code: row.get::<_, Option<String>>(3).ok().flatten().filter(|c| !c.is_empty()),
        entry_time: timestamp(4, "entry_time")?,
        exit_time: timestamp(5, "exit_time")?,
        duration_seconds,
    }
    .validate(id)
}
