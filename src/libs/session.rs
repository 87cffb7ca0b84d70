//! Persisted timer state between process runs.
//!
//! A CLI invocation lives for one command, so the host saves the owner's
//! [`SessionTimerState`] after each transition and loads it before the next.
//! The SQLite backend keeps it in the `sessions` table
//! ([`Sessions`](crate::db::sessions::Sessions)); the CSV backend uses a JSON
//! file next to the log.

use crate::libs::error::Result;
use crate::libs::store::{format_timestamp, parse_timestamp};
use crate::libs::timer::SessionTimerState;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub trait SessionStore {
    /// State saved for `owner_id`, or a fresh idle state when nothing was saved.
    fn load(&self, owner_id: &str, idle_label: &str) -> Result<SessionTimerState>;

    fn save(&self, owner_id: &str, state: &SessionTimerState) -> Result<()>;

    /// Saves `state` only if the stored state still equals `expected`, i.e.
    /// no other invocation has moved the timer since `expected` was loaded.
    /// Returns `false` and leaves the stored state alone otherwise.
    fn compare_and_save(&self, owner_id: &str, expected: &SessionTimerState, state: &SessionTimerState) -> Result<bool>;
}

/// Serialized form of a timer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub current_area: String,
    pub started_at: Option<String>,
}

impl PersistedSession {
    pub fn from_state(state: &SessionTimerState) -> Self {
        Self {
            current_area: state.current_area().to_string(),
            started_at: state.interval_started_at().as_ref().map(format_timestamp),
        }
    }

    /// An unreadable start time restores as inactive rather than failing the host.
    pub fn into_state(self, idle_label: &str) -> SessionTimerState {
        let since = self.started_at.as_deref().and_then(parse_timestamp);
        SessionTimerState::restore(idle_label, self.current_area, since)
    }
}

/// Per-owner sessions stored as one JSON object.
pub struct JsonSessionFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonSessionFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, PersistedSession>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, sessions: &BTreeMap<String, PersistedSession>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(sessions)?)?;
        Ok(())
    }
}

impl SessionStore for JsonSessionFile {
    fn load(&self, owner_id: &str, idle_label: &str) -> Result<SessionTimerState> {
        let _guard = self.lock.lock();
        Ok(match self.read_all()?.remove(owner_id) {
            Some(session) => session.into_state(idle_label),
            None => SessionTimerState::new(idle_label),
        })
    }

    fn save(&self, owner_id: &str, state: &SessionTimerState) -> Result<()> {
        let _guard = self.lock.lock();
        let mut sessions = self.read_all()?;
        sessions.insert(owner_id.to_string(), PersistedSession::from_state(state));
        self.write_all(&sessions)
    }

    fn compare_and_save(&self, owner_id: &str, expected: &SessionTimerState, state: &SessionTimerState) -> Result<bool> {
        let _guard = self.lock.lock();
        let mut sessions = self.read_all()?;

        // Compared as loaded, so an unreadable start time does not block saves.
        let stored = match sessions.get(owner_id).cloned() {
            Some(session) => session.into_state(expected.idle_label()),
            None => SessionTimerState::new(expected.idle_label()),
        };
        if PersistedSession::from_state(&stored) != PersistedSession::from_state(expected) {
            return Ok(false);
        }

        sessions.insert(owner_id.to_string(), PersistedSession::from_state(state));
        self.write_all(&sessions)?;
        Ok(true)
    }
}
