//! Host-side façade tying a session timer to its owner, area table, store and clock.
//!
//! ```rust,no_run
//! use arealog::libs::{area::AreaTable, clock::SystemClock, store::MemoryStore, tracker::Tracker};
//!
//! let mut tracker = Tracker::new("alice", AreaTable::default(), MemoryStore::new(), SystemClock);
//! tracker.start()?;
//! tracker.switch_area("Training")?;
//! tracker.stop()?;
//! # Ok::<(), arealog::libs::error::TrackerError>(())
//! ```

use crate::libs::area::AreaTable;
use crate::libs::clock::Clock;
use crate::libs::error::{Result, TrackerError};
use crate::libs::recorder;
use crate::libs::store::{EntryId, LogStore};
use crate::libs::timer::{SessionTimerState, Transition};
use chrono::Duration;

pub struct Tracker<S: LogStore, C: Clock> {
    owner_id: String,
    areas: AreaTable,
    store: S,
    clock: C,
    state: SessionTimerState,
}

impl<S: LogStore, C: Clock> Tracker<S, C> {
    pub fn new(owner_id: impl Into<String>, areas: AreaTable, store: S, clock: C) -> Self {
        let state = SessionTimerState::new(areas.idle_label());
        Self {
            owner_id: owner_id.into(),
            areas,
            store,
            clock,
            state,
        }
    }

    /// Resumes a previously saved state.
    ///
    /// Fails with [`TrackerError::InvalidTransition`] when the saved interval
    /// starts after the clock's current time.
    pub fn resume(owner_id: impl Into<String>, areas: AreaTable, store: S, clock: C, state: SessionTimerState) -> Result<Self> {
        if let Some(since) = state.interval_started_at() {
            let now = clock.now();
            if since > now {
                return Err(TrackerError::InvalidTransition(format!(
                    "saved session starts at {} which is after the current time {}",
                    since, now
                )));
            }
        }

        Ok(Self {
            owner_id: owner_id.into(),
            areas,
            store,
            clock,
            state,
        })
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn areas(&self) -> &AreaTable {
        &self.areas
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> &SessionTimerState {
        &self.state
    }

    pub fn into_state(self) -> SessionTimerState {
        self.state
    }

    pub fn elapsed(&self) -> Duration {
        self.state.elapsed(self.clock.now())
    }

    pub fn start(&mut self) -> Result<Option<EntryId>> {
        let now = self.clock.now();
        let transition = self.state.clone().start(now);
        self.commit(transition)
    }

    /// Starts logging directly in `area`. The idle interval opened and closed
    /// at the same instant is dropped by the recorder.
    pub fn start_in(&mut self, area: &str) -> Result<Option<EntryId>> {
        let area = self.areas.resolve(area)?;
        let now = self.clock.now();

        let started = self.state.clone().start(now);
        let switched = started.state.switch_area(&area, now);
        let completed = switched.completed.filter(|interval| interval.duration() > Duration::zero());
        self.commit(Transition {
            state: switched.state,
            completed,
        })
    }

    /// Switches to `area`, which may be an ordinal, a display name or `idle`.
    pub fn switch_area(&mut self, area: &str) -> Result<Option<EntryId>> {
        let area = self.areas.resolve(area)?;
        let now = self.clock.now();
        let transition = self.state.clone().switch_area(&area, now);
        self.commit(transition)
    }

    pub fn stop(&mut self) -> Result<Option<EntryId>> {
        let now = self.clock.now();
        let transition = self.state.clone().stop(now);
        self.commit(transition)
    }

    /// Records the completed interval, then advances the state. A storage
    /// failure leaves the state untouched.
    fn commit(&mut self, transition: Transition) -> Result<Option<EntryId>> {
        let id = match &transition.completed {
            Some(interval) => recorder::record(interval, &self.owner_id, &self.areas, &self.store)?,
            None => None,
        };
        self.state = transition.state;
        Ok(id)
    }
}
