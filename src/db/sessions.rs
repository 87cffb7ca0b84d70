//! Saved timer state per owner in the `sessions` table.
//!
//! Each CLI invocation is a separate process, so the timer state of every
//! owner is loaded before a command and saved after it.
//!
//! ## Features
//!
//! - **Upsert**: one row per owner, replaced on every save
//! - **Compare-and-save**: a save that only applies while the stored row
//!   still holds the state the caller started from
//! - **Immediate transactions**: [`SessionTransaction`] takes SQLite's write
//!   lock up front, so recording an interval and saving the new state happen
//!   atomically with respect to other processes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arealog::db::log_entries::LogEntries;
//! use arealog::db::sessions::Sessions;
//! use arealog::libs::session::SessionStore;
//!
//! let entries = LogEntries::open("/tmp/arealog.db")?;
//! let sessions = Sessions::new(entries.connection());
//!
//! let tx = sessions.begin()?;
//! let before = sessions.load("alice", "Untracked (Idle)")?;
//! let after = before.clone().start(chrono::Local::now().naive_local()).state;
//! if sessions.compare_and_save("alice", &before, &after)? {
//!     tx.commit()?;
//! }
//! # Ok::<(), arealog::libs::error::TrackerError>(())
//! ```

use crate::libs::error::Result;
use crate::libs::session::{PersistedSession, SessionStore};
use crate::libs::timer::SessionTimerState;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;
use tracing::{debug, warn};

/// Select the saved state of one owner.
///
/// `started_at` is only meaningful while `active` is set.
const SELECT_SESSION: &str = "SELECT current_area, started_at, active FROM sessions WHERE owner_id = ?1";

/// Insert or replace the saved state of one owner.
const UPSERT_SESSION: &str = "INSERT INTO sessions (owner_id, current_area, started_at, active, updated_at)
    VALUES (?1, ?2, ?3, ?4, CURRENT_TIMESTAMP)
    ON CONFLICT(owner_id) DO UPDATE SET
        current_area = excluded.current_area,
        started_at = excluded.started_at,
        active = excluded.active,
        updated_at = excluded.updated_at";

/// Insert or replace the saved state only while the stored row still matches
/// `?5..?7`. Zero changed rows means another invocation got there first.
/// A missing row is always inserted.
const UPSERT_SESSION_IF_UNCHANGED: &str = "INSERT INTO sessions (owner_id, current_area, started_at, active, updated_at)
    VALUES (?1, ?2, ?3, ?4, CURRENT_TIMESTAMP)
    ON CONFLICT(owner_id) DO UPDATE SET
        current_area = excluded.current_area,
        started_at = excluded.started_at,
        active = excluded.active,
        updated_at = excluded.updated_at
    WHERE sessions.current_area = ?5 AND sessions.started_at IS ?6 AND sessions.active = ?7";

/// Timer state per owner in the `sessions` table.
pub struct Sessions {
    pub conn: Arc<Mutex<Connection>>,
}

impl Sessions {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Starts an immediate transaction on the shared connection. Every
    /// statement on that connection, log appends included, belongs to it
    /// until [`SessionTransaction::commit`] or drop.
    pub fn begin(&self) -> Result<SessionTransaction> {
        self.conn.lock().execute_batch("BEGIN IMMEDIATE")?;
        debug!("session transaction started");
        Ok(SessionTransaction {
            conn: Arc::clone(&self.conn),
            finished: false,
        })
    }

    /// Stored row as `(current_area, started_at, active)`.
    fn load_row(conn: &Connection, owner_id: &str) -> Result<Option<(String, Option<String>, bool)>> {
        Ok(conn
            .query_row(SELECT_SESSION, params![owner_id], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .optional()?)
    }

    fn into_state(row: Option<(String, Option<String>, bool)>, idle_label: &str) -> SessionTimerState {
        match row {
            Some((current_area, started_at, active)) => PersistedSession {
                current_area,
                started_at: started_at.filter(|_| active),
            }
            .into_state(idle_label),
            None => SessionTimerState::new(idle_label),
        }
    }
}

impl SessionStore for Sessions {
    fn load(&self, owner_id: &str, idle_label: &str) -> Result<SessionTimerState> {
        let conn = self.conn.lock();
        Ok(Self::into_state(Self::load_row(&conn, owner_id)?, idle_label))
    }

    fn save(&self, owner_id: &str, state: &SessionTimerState) -> Result<()> {
        let persisted = PersistedSession::from_state(state);
        self.conn.lock().execute(
            UPSERT_SESSION,
            params![owner_id, persisted.current_area, persisted.started_at, state.is_active()],
        )?;
        Ok(())
    }

    fn compare_and_save(&self, owner_id: &str, expected: &SessionTimerState, state: &SessionTimerState) -> Result<bool> {
        let conn = self.conn.lock();

        // Compared as loaded, so an unreadable start time does not block saves.
        let row = Self::load_row(&conn, owner_id)?;
        let stored = Self::into_state(row.clone(), expected.idle_label());
        if PersistedSession::from_state(&stored) != PersistedSession::from_state(expected) {
            return Ok(false);
        }

        // The conditional upsert matches the raw row that was just compared.
        let (old_area, old_started_at, old_active) = row.unwrap_or_default();
        let persisted = PersistedSession::from_state(state);
        let changed = conn.execute(
            UPSERT_SESSION_IF_UNCHANGED,
            params![
                owner_id,
                persisted.current_area,
                persisted.started_at,
                state.is_active(),
                old_area,
                old_started_at,
                old_active,
            ],
        )?;
        Ok(changed == 1)
    }
}

/// Open `BEGIN IMMEDIATE` transaction; rolled back on drop unless committed.
pub struct SessionTransaction {
    conn: Arc<Mutex<Connection>>,
    finished: bool,
}

impl SessionTransaction {
    pub fn commit(mut self) -> Result<()> {
        self.conn.lock().execute_batch("COMMIT")?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for SessionTransaction {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        match self.conn.lock().execute_batch("ROLLBACK") {
            Ok(()) => debug!("session transaction rolled back"),
            Err(e) => warn!(error = %e, "failed to roll back session transaction"),
        }
    }
}
