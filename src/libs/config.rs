//! Application configuration.
//!
//! Stored as pretty-printed JSON in `config.json` inside the
//! [`DataStorage`] directory. Every field is optional; a missing file means
//! the built-in defaults (ten areas, `Untracked (Idle)`, SQLite storage).
//!
//! ```json
//! {
//!   "owner": "alice",
//!   "idle_label": "Untracked (Idle)",
//!   "areas": [
//!     { "name": "ESS Chambers", "department_code": "ESS" },
//!     { "name": "Training", "department_code": "TRAIN" }
//!   ],
//!   "storage": { "backend": "csv", "path": "/srv/arealog/time_log.csv" }
//! }
//! ```

use super::data_storage::DataStorage;
use crate::libs::area::{AreaTable, DEFAULT_AREAS, DEFAULT_IDLE_LABEL};
use crate::libs::messages::Message;
use crate::{msg_error_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "arealog.db";
pub const CSV_FILE_NAME: &str = "time_log.csv";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AreaConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_code: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Csv,
}

impl StorageBackend {
    pub const ALL: [StorageBackend; 2] = [StorageBackend::Sqlite, StorageBackend::Csv];

    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Csv => "csv",
        }
    }

    fn default_file_name(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => DB_FILE_NAME,
            StorageBackend::Csv => CSV_FILE_NAME,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database or CSV file; defaults to a file in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub areas: Option<Vec<AreaConfig>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        DataStorage::new().get_path(CONFIG_FILE_NAME)
    }

    pub fn read() -> Result<Config> {
        Self::read_from(Self::path()?)
    }

    /// Reads a config file, returning defaults when it does not exist.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        serde_json::from_str(&config_str).map_err(|e| msg_error_anyhow!(Message::ConfigParseError(e.to_string())))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(Self::path()?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn idle_label(&self) -> &str {
        self.idle_label.as_deref().filter(|l| !l.trim().is_empty()).unwrap_or(DEFAULT_IDLE_LABEL)
    }

    /// Owner id: explicit override, then the configured owner, then the OS user.
    pub fn owner(&self, explicit: Option<&str>) -> String {
        let nonblank = |o: &String| !o.trim().is_empty();
        explicit
            .map(str::to_string)
            .filter(nonblank)
            .or_else(|| self.owner.clone().filter(nonblank))
            .or_else(|| env::var("USER").ok().filter(nonblank))
            .or_else(|| env::var("USERNAME").ok().filter(nonblank))
            .unwrap_or_else(|| "default".to_string())
    }

    /// Validated area table; duplicate names are a configuration error.
    pub fn area_table(&self) -> Result<AreaTable> {
        let table = match &self.areas {
            None => {
                let idle = self.idle_label();
                let areas = DEFAULT_AREAS.iter().map(|(name, code)| (*name, Some(*code)));
                AreaTable::new(areas, idle)
            }
            Some(areas) => AreaTable::new(
                areas.iter().map(|a| (a.name.clone(), a.department_code.clone())),
                self.idle_label(),
            ),
        };
        table.map_err(|e| msg_error_anyhow!(Message::ConfigInvalidAreas(e.to_string())))
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.as_ref().map(|s| s.backend).unwrap_or_default()
    }

    /// Resolved storage file for the configured backend.
    pub fn storage_path(&self, data: &DataStorage) -> Result<PathBuf> {
        match self.storage.as_ref().and_then(|s| s.path.clone()) {
            Some(path) => Ok(path),
            None => data.get_path(self.storage_backend().default_file_name()),
        }
    }

    /// Interactive setup wizard; existing values are offered as defaults.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        let owner: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptOwner.to_string())
            .default(config.owner(None))
            .interact_text()?;
        config.owner = Some(owner);

        let idle_label: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptIdleLabel.to_string())
            .default(config.idle_label().to_string())
            .interact_text()?;
        config.idle_label = Some(idle_label);

        let current = config.storage_backend();
        let backend_index = Select::with_theme(&theme)
            .with_prompt(Message::PromptStorageBackend.to_string())
            .items(&StorageBackend::ALL.iter().map(|b| b.name()).collect::<Vec<_>>())
            .default(StorageBackend::ALL.iter().position(|b| *b == current).unwrap_or(0))
            .interact()?;

        let path: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptStoragePath.to_string())
            .allow_empty(true)
            .default(
                config
                    .storage
                    .as_ref()
                    .and_then(|s| s.path.as_ref())
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            )
            .interact_text()?;

        config.storage = Some(StorageConfig {
            backend: StorageBackend::ALL[backend_index],
            path: Some(path.trim()).filter(|p| !p.is_empty()).map(PathBuf::from),
        });

        if let Some(areas) = &config.areas {
            msg_print!(Message::ConfigAreasKept(areas.len()));
        } else {
            let keep_defaults = Confirm::with_theme(&theme)
                .with_prompt(Message::PromptKeepDefaultAreas.to_string())
                .default(true)
                .interact()?;
            if !keep_defaults {
                // Written out so the user can edit names and codes in config.json.
                config.areas = Some(
                    DEFAULT_AREAS
                        .iter()
                        .map(|(name, code)| AreaConfig {
                            name: name.to_string(),
                            department_code: Some(code.to_string()),
                        })
                        .collect(),
                );
            }
        }

        config.area_table()?;
        Ok(config)
    }
}
