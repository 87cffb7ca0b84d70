//! Versioned schema migrations for the SQLite log store.
//!
//! Applied migrations are recorded in the `migrations` table; opening a
//! database runs every registered migration newer than the recorded maximum
//! inside one transaction.

use crate::libs::error::Result;
use crate::libs::messages::Message;
use crate::msg_debug;
use rusqlite::{params, Connection, Transaction};
use tracing::{error, info};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> rusqlite::Result<()>,
}

pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        self.add_migration(1, "create_log_entries", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS log_entries (
                    id INTEGER PRIMARY KEY,
                    owner_id TEXT NOT NULL,
                    area_name TEXT NOT NULL,
                    department_code TEXT,
                    entry_time TEXT NOT NULL,
                    exit_time TEXT NOT NULL,
                    duration_seconds REAL NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_log_entries_owner_entry ON log_entries(owner_id, entry_time)",
                [],
            )?;
            Ok(())
        });

        // Timer state of each owner between CLI invocations.
        self.add_migration(2, "create_sessions", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS sessions (
                    owner_id TEXT PRIMARY KEY,
                    current_area TEXT NOT NULL,
                    started_at TEXT,
                    active INTEGER NOT NULL DEFAULT 0,
                    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> rusqlite::Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DbUpToDate(current_version));
            return Ok(());
        }

        let tx = conn.transaction()?;
        for migration in pending {
            if let Err(e) = (migration.up)(&tx) {
                error!("{}", Message::DbMigrationFailed { version: migration.version, error: e.to_string() });
                return Err(e.into());
            }
            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
            info!(
                "{}",
                Message::DbMigrationApplied {
                    version: migration.version,
                    name: migration.name.to_string(),
                }
            );
        }
        tx.commit()?;

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        conn.execute(MIGRATIONS_TABLE, [])?;
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String)>> {
        let mut stmt = conn.prepare("SELECT version, name FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(history)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
