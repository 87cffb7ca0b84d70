//! SQLite persistence.
//!
//! - [`db`]: connection setup; every open runs pending migrations
//! - [`migrations`]: versioned schema changes
//! - [`log_entries`]: the SQLite [`LogStore`](crate::libs::store::LogStore)
//! - [`sessions`]: saved timer state per owner

pub mod db;
pub mod log_entries;
pub mod migrations;
pub mod sessions;
