use crate::libs::area::AreaTable;
use crate::libs::backend::{Backend, SessionUpdate};
use crate::libs::clock::SystemClock;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::store::LogStore;
use crate::libs::tracker::Tracker;
use anyhow::Result;

pub type HostTracker<'a> = Tracker<&'a dyn LogStore, SystemClock>;

/// Everything a command needs: configuration, owner, areas and storage.
pub struct Context {
    pub config: Config,
    pub owner: String,
    pub areas: AreaTable,
    pub backend: Backend,
}

impl Context {
    pub fn load(owner: Option<&str>) -> Result<Self> {
        let config = Config::read()?;
        let owner = config.owner(owner);
        let areas = config.area_table()?;
        let backend = Backend::open(&config, &DataStorage::new())?;

        Ok(Self {
            config,
            owner,
            areas,
            backend,
        })
    }

    pub fn store(&self) -> &dyn LogStore {
        self.backend.store()
    }

    /// Read-only tracker over the owner's saved state.
    pub fn tracker(&self) -> Result<HostTracker<'_>> {
        let state = self.backend.sessions().load(&self.owner, self.areas.idle_label())?;
        self.backend.resume(&self.owner, &self.areas, SystemClock, state)
    }

    /// Applies `f` to the owner's saved timer and saves the result atomically.
    pub fn update<T>(&self, f: impl FnOnce(&mut HostTracker<'_>) -> Result<T>) -> Result<SessionUpdate<T>> {
        self.backend.update_session(&self.owner, &self.areas, SystemClock, f)
    }
}
