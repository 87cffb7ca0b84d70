//! Opens the configured log store and its matching session store, and runs
//! timer updates against them.
//!
//! A timer update loads the owner's saved state, applies one or more
//! transitions, records the intervals they close and saves the new state.
//! [`Backend::update_session`] does all of that under an exclusive lock:
//!
//! - **SQLite**: one `BEGIN IMMEDIATE` transaction around load, appends and a
//!   compare-and-save of the session row
//! - **CSV**: an advisory lock on `<log>.csv.lock`; appends made before a
//!   failed save are truncated away
//!
//! Two overlapping invocations are serialized, and the second one resumes
//! from the state the first one saved, so closed intervals never overlap.

use crate::db::log_entries::LogEntries;
use crate::db::sessions::{SessionTransaction, Sessions};
use crate::libs::area::AreaTable;
use crate::libs::clock::Clock;
use crate::libs::config::{Config, StorageBackend};
use crate::libs::csv_store::{CsvLogFile, CsvLogLock};
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::session::{JsonSessionFile, SessionStore};
use crate::libs::store::LogStore;
use crate::libs::timer::SessionTimerState;
use crate::libs::tracker::Tracker;
use crate::{msg_debug, msg_error_anyhow, msg_warning};
use anyhow::Result;
use std::path::{Path, PathBuf};

enum Storage {
    Sqlite { entries: LogEntries, sessions: Sessions },
    Csv { log: CsvLogFile, sessions: JsonSessionFile },
}

/// Exclusive hold on a backend for one timer update.
pub enum BackendLock<'a> {
    Sqlite(SessionTransaction),
    Csv(CsvLogLock<'a>),
}

impl BackendLock<'_> {
    pub fn commit(self) -> Result<()> {
        match self {
            BackendLock::Sqlite(tx) => tx.commit()?,
            BackendLock::Csv(lock) => lock.commit(),
        }
        Ok(())
    }
}

/// Outcome of [`Backend::update_session`].
#[derive(Debug)]
pub struct SessionUpdate<T> {
    pub before: SessionTimerState,
    pub after: SessionTimerState,
    pub value: T,
}

pub struct Backend {
    pub kind: StorageBackend,
    pub path: PathBuf,
    storage: Storage,
}

impl Backend {
    pub fn open(config: &Config, data: &DataStorage) -> Result<Self> {
        let kind = config.storage_backend();
        let path = config.storage_path(data)?;
        Self::open_at(kind, &path)
    }

    pub fn open_at(kind: StorageBackend, path: &Path) -> Result<Self> {
        let storage = match kind {
            StorageBackend::Sqlite => {
                let entries = LogEntries::open(path)?;
                let sessions = Sessions::new(entries.connection());
                Storage::Sqlite { entries, sessions }
            }
            StorageBackend::Csv => Storage::Csv {
                log: CsvLogFile::open(path)?,
                sessions: JsonSessionFile::new(path.with_extension("sessions.json")),
            },
        };

        msg_debug!(Message::StorageOpened {
            backend: kind.name().to_string(),
            path: path.display().to_string(),
        });

        Ok(Self {
            kind,
            path: path.to_path_buf(),
            storage,
        })
    }

    pub fn store(&self) -> &dyn LogStore {
        match &self.storage {
            Storage::Sqlite { entries, .. } => entries,
            Storage::Csv { log, .. } => log,
        }
    }

    pub fn sessions(&self) -> &dyn SessionStore {
        match &self.storage {
            Storage::Sqlite { sessions, .. } => sessions,
            Storage::Csv { sessions, .. } => sessions,
        }
    }

    /// Blocks until this process may update sessions and append entries.
    pub fn lock(&self) -> Result<BackendLock<'_>> {
        Ok(match &self.storage {
            Storage::Sqlite { sessions, .. } => BackendLock::Sqlite(sessions.begin()?),
            Storage::Csv { log, .. } => BackendLock::Csv(log.lock()?),
        })
    }

    /// Tracker over `state`. A state that cannot be resumed, such as one
    /// starting in the future, is reported and restarted inactive.
    pub fn resume<C: Clock + Copy>(&self, owner_id: &str, areas: &AreaTable, clock: C, state: SessionTimerState) -> Result<Tracker<&dyn LogStore, C>> {
        match Tracker::resume(owner_id, areas.clone(), self.store(), clock, state.clone()) {
            Ok(tracker) => Ok(tracker),
            Err(e) => {
                msg_warning!(Message::SessionResumeFailed(e.to_string()));
                let reset = SessionTimerState::restore(areas.idle_label(), state.current_area(), None);
                Ok(Tracker::resume(owner_id, areas.clone(), self.store(), clock, reset)?)
            }
        }
    }

    /// Runs `update` on the owner's saved timer and saves the result, all
    /// under [`Backend::lock`]. If `update` fails, or the saved state changed
    /// underneath, nothing it recorded is kept.
    pub fn update_session<C, T, F>(&self, owner_id: &str, areas: &AreaTable, clock: C, update: F) -> Result<SessionUpdate<T>>
    where
        C: Clock + Copy,
        F: FnOnce(&mut Tracker<&dyn LogStore, C>) -> Result<T>,
    {
        let lock = self.lock()?;

        let before = self.sessions().load(owner_id, areas.idle_label())?;
        let mut tracker = self.resume(owner_id, areas, clock, before.clone())?;
        let value = update(&mut tracker)?;
        let after = tracker.into_state();

        if !self.sessions().compare_and_save(owner_id, &before, &after)? {
            return Err(msg_error_anyhow!(Message::SessionChanged(owner_id.to_string())));
        }
        lock.commit()?;

        Ok(SessionUpdate { before, after, value })
    }
}
