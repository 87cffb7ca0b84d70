//! Read-side rollups over persisted log entries.
//!
//! Every function fetches the owner's entries whose `entry_time` falls in the
//! inclusive calendar [`DateRange`], skips rows the store could not decode and
//! reports how many it skipped alongside the result.

use crate::libs::error::{Result, TrackerError};
use crate::libs::store::{end_of_day, start_of_day, LogEntry, LogStore};
use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Area,
    Department,
}

impl GroupBy {
    /// Bucket key of an entry. Entries without a department code share the empty key.
    pub fn key(&self, entry: &LogEntry) -> String {
        match self {
            GroupBy::Area => entry.area_name.clone(),
            GroupBy::Department => entry.department_code.clone().unwrap_or_default(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GroupBy::Area => "Area",
            GroupBy::Department => "Department",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(TrackerError::InvalidDateRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Self { from, to })
    }

    pub fn day(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// `[from 00:00:00, to 23:59:59.999999]`
    pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        (start_of_day(self.from), end_of_day(self.to))
    }
}

/// An aggregation result plus the number of malformed rows left out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate<T> {
    pub value: T,
    pub skipped: usize,
}

impl<T> Aggregate<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> Aggregate<U> {
        Aggregate {
            value: f(self.value),
            skipped: self.skipped,
        }
    }
}

/// Row-level interval for timeline rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub group_key: String,
    pub area_name: String,
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub duration_seconds: f64,
}

fn fetch<S: LogStore + ?Sized>(owner_id: &str, range: &DateRange, store: &S) -> Result<Aggregate<Vec<LogEntry>>> {
    let (from, to) = range.bounds();
    let rows = store.query_log_entries(owner_id, from, to)?;

    let mut entries = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    for row in rows {
        match row {
            Ok(entry) => entries.push(entry),
            Err(malformed) => {
                warn!(row = malformed.row, reason = %malformed.reason, "skipping malformed log entry");
                skipped += 1;
            }
        }
    }

    Ok(Aggregate { value: entries, skipped })
}

fn sum_hours<'a>(entries: impl Iterator<Item = &'a LogEntry>, group_by: GroupBy) -> HashMap<String, f64> {
    let mut seconds: HashMap<String, f64> = HashMap::new();
    for entry in entries {
        *seconds.entry(group_by.key(entry)).or_default() += entry.duration_seconds;
    }
    seconds.into_iter().map(|(key, secs)| (key, secs / 3600.0)).collect()
}

/// Entries of the range ordered by entry time.
pub fn entries<S: LogStore + ?Sized>(owner_id: &str, range: &DateRange, store: &S) -> Result<Aggregate<Vec<LogEntry>>> {
    Ok(fetch(owner_id, range, store)?.map(|mut entries| {
        entries.sort_by_key(|e| e.entry_time);
        entries
    }))
}

/// Hours per area or per department code.
pub fn totals_by_group<S: LogStore + ?Sized>(owner_id: &str, range: &DateRange, group_by: GroupBy, store: &S) -> Result<Aggregate<HashMap<String, f64>>> {
    Ok(fetch(owner_id, range, store)?.map(|entries| sum_hours(entries.iter(), group_by)))
}

/// Hours per calendar date of `entry_time`, then per group.
pub fn daily_series<S: LogStore + ?Sized>(
    owner_id: &str,
    range: &DateRange,
    group_by: GroupBy,
    store: &S,
) -> Result<Aggregate<BTreeMap<NaiveDate, HashMap<String, f64>>>> {
    Ok(fetch(owner_id, range, store)?.map(|entries| {
        let mut by_date: BTreeMap<NaiveDate, Vec<&LogEntry>> = BTreeMap::new();
        for entry in &entries {
            by_date.entry(entry.date()).or_default().push(entry);
        }
        by_date
            .into_iter()
            .map(|(date, day)| (date, sum_hours(day.into_iter(), group_by)))
            .collect()
    }))
}

/// One row per entry, in the order the store returned them.
pub fn timeline_rows<S: LogStore + ?Sized>(owner_id: &str, range: &DateRange, group_by: GroupBy, store: &S) -> Result<Aggregate<Vec<TimelineRow>>> {
    Ok(fetch(owner_id, range, store)?.map(|entries| {
        entries
            .into_iter()
            .map(|entry| TimelineRow {
                group_key: group_by.key(&entry),
                area_name: entry.area_name,
                entry_time: entry.entry_time,
                exit_time: entry.exit_time,
                duration_seconds: entry.duration_seconds,
            })
            .collect()
    }))
}

/// Sorts totals for display: largest first, ties by key.
pub fn sorted_totals(totals: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut rows: Vec<(String, f64)> = totals.iter().map(|(k, v)| (k.clone(), *v)).collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}
