//! Error types for the time tracking core.
//!
//! The core distinguishes three kinds of failure:
//!
//! - **Invalid transitions**: a saved timer state that cannot be resumed,
//!   such as an interval starting after the current time. The timer itself
//!   treats illegal transitions as no-ops.
//! - **Storage failures**: connectivity, I/O or SQL errors from a log store.
//!   These are always propagated to the caller.
//! - **Malformed records**: a stored row that cannot be turned into a
//!   [`LogEntry`](crate::libs::store::LogEntry). Aggregation skips these and
//!   reports how many were skipped instead of failing.
//!
//! Host code (commands, export, config) wraps these in `anyhow::Error`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Malformed(#[from] MalformedRecord),

    #[error("Unknown area: {0}")]
    UnknownArea(String),

    #[error("Duplicate area name in area table: {0}")]
    DuplicateArea(String),

    #[error("Area name is reserved for the idle area: {0}")]
    ReservedArea(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: String, to: String },
}

impl From<rusqlite::Error> for TrackerError {
    fn from(err: rusqlite::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<csv::Error> for TrackerError {
    fn from(err: csv::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

/// A stored row that is missing a required field or holds an unparseable value.
///
/// `row` identifies the row in backend terms: the SQLite rowid, or the
/// 1-based line number of a CSV file.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Malformed record at row {row}: {reason}")]
pub struct MalformedRecord {
    pub row: i64,
    pub reason: String,
}

impl MalformedRecord {
    pub fn new(row: i64, reason: impl Into<String>) -> Self {
        Self { row, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
