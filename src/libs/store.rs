//! Log entry model and the storage contract used by the core.
//!
//! A [`LogStore`] is the only way the recorder and the aggregator touch
//! persisted data. Three implementations ship with the crate:
//!
//! - [`Db`](crate::db::db::Db)-backed [`LogEntries`](crate::db::log_entries::LogEntries) (SQLite)
//! - [`CsvLogFile`](crate::libs::csv_store::CsvLogFile) (append-only CSV file)
//! - [`MemoryStore`] (process memory, used by tests and embedded hosts)
//!
//! Queries return one [`RowResult`] per stored row so that a single damaged
//! row can be skipped by the caller instead of failing the whole read.

use crate::libs::error::{MalformedRecord, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Timestamp layout shared by every persistent backend.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub type EntryId = i64;

/// Allowed gap between a stored duration and `exit_time - entry_time`.
/// Covers files written with whole-second durations.
pub const DURATION_TOLERANCE_SECONDS: f64 = 1.0;

/// Result for a single stored row.
pub type RowResult = std::result::Result<LogEntry, MalformedRecord>;

/// One persisted, closed interval spent in an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub owner_id: String,
    pub area_name: String,
    pub department_code: Option<String>,
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub duration_seconds: f64,
}

impl LogEntry {
    pub fn duration_hours(&self) -> f64 {
        self.duration_seconds / 3600.0
    }

    /// Local calendar date the entry is attributed to.
    pub fn date(&self) -> NaiveDate {
        self.entry_time.date()
    }

    /// Checks a decoded row against the entry invariants: exit after entry
    /// and a finite, positive duration that matches the timestamps.
    pub fn validate(self, row: i64) -> RowResult {
        if self.exit_time <= self.entry_time {
            return Err(MalformedRecord::new(
                row,
                format!("exit_time {} is not after entry_time {}", self.exit_time, self.entry_time),
            ));
        }
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return Err(MalformedRecord::new(row, format!("invalid duration_seconds: {}", self.duration_seconds)));
        }

        let span = (self.exit_time - self.entry_time)
            .num_microseconds()
            .map(|micros| micros as f64 / 1_000_000.0)
            .unwrap_or(f64::INFINITY);
        if (span - self.duration_seconds).abs() > DURATION_TOLERANCE_SECONDS {
            return Err(MalformedRecord::new(
                row,
                format!("duration_seconds {} does not match the {} second interval", self.duration_seconds, span),
            ));
        }

        Ok(self)
    }
}

pub trait LogStore {
    fn append_log_entry(&self, entry: &LogEntry) -> Result<EntryId>;

    /// Rows of `owner_id` whose `entry_time` lies in `[from, to]`. Order is unspecified.
    fn query_log_entries(&self, owner_id: &str, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<RowResult>>;

    /// Removes every entry of one owner. Callers must gate this behind an explicit opt-in.
    fn delete_log_entries(&self, owner_id: &str) -> Result<usize>;

    /// Removes every entry of every owner. Callers must gate this behind an explicit opt-in.
    fn delete_all_log_entries(&self) -> Result<usize>;
}

impl<S: LogStore + ?Sized> LogStore for &S {
    fn append_log_entry(&self, entry: &LogEntry) -> Result<EntryId> {
        (**self).append_log_entry(entry)
    }

    fn query_log_entries(&self, owner_id: &str, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<RowResult>> {
        (**self).query_log_entries(owner_id, from, to)
    }

    fn delete_log_entries(&self, owner_id: &str) -> Result<usize> {
        (**self).delete_log_entries(owner_id)
    }

    fn delete_all_log_entries(&self) -> Result<usize> {
        (**self).delete_all_log_entries()
    }
}

impl<S: LogStore + ?Sized> LogStore for Box<S> {
    fn append_log_entry(&self, entry: &LogEntry) -> Result<EntryId> {
        (**self).append_log_entry(entry)
    }

    fn query_log_entries(&self, owner_id: &str, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<RowResult>> {
        (**self).query_log_entries(owner_id, from, to)
    }

    fn delete_log_entries(&self, owner_id: &str) -> Result<usize> {
        (**self).delete_log_entries(owner_id)
    }

    fn delete_all_log_entries(&self) -> Result<usize> {
        (**self).delete_all_log_entries()
    }
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp. Accepts values with or without fractional seconds.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// First instant of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable instant of `date` at microsecond precision.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// In-process store guarded by a mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<(EntryId, RowResult)>>,
    next_id: Mutex<EntryId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw row, including damaged ones; used to seed fixtures.
    pub fn push_row(&self, row: RowResult) -> EntryId {
        let mut next_id = self.next_id.lock();
        *next_id += 1;
        let id = *next_id;
        self.rows.lock().push((id, row));
        id
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

impl LogStore for MemoryStore {
    fn append_log_entry(&self, entry: &LogEntry) -> Result<EntryId> {
        Ok(self.push_row(Ok(entry.clone())))
    }

    fn query_log_entries(&self, owner_id: &str, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<RowResult>> {
        let rows = self.rows.lock();
        Ok(rows
            .iter()
            .filter(|(_, row)| match row {
                Ok(entry) => entry.owner_id == owner_id && entry.entry_time >= from && entry.entry_time <= to,
                Err(_) => true,
            })
            .map(|(_, row)| row.clone())
            .collect())
    }

    fn delete_log_entries(&self, owner_id: &str) -> Result<usize> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|(_, row)| !matches!(row, Ok(entry) if entry.owner_id == owner_id));
        Ok(before - rows.len())
    }

    fn delete_all_log_entries(&self) -> Result<usize> {
        let mut rows = self.rows.lock();
        let removed = rows.len();
        rows.clear();
        Ok(removed)
    }
}
