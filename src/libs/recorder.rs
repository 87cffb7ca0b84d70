//! Turns completed timer intervals into persisted log entries.

use crate::libs::area::AreaTable;
use crate::libs::error::Result;
use crate::libs::store::{EntryId, LogEntry, LogStore};
use crate::libs::timer::CompletedInterval;
use tracing::debug;

/// Builds the entry for `interval`, or `None` when its duration is not positive.
///
/// Unknown area names are kept as-is with no department code.
pub fn to_log_entry(interval: &CompletedInterval, owner_id: &str, areas: &AreaTable) -> Option<LogEntry> {
    let micros = interval.duration().num_microseconds()?;
    if micros <= 0 {
        return None;
    }

    Some(LogEntry {
        owner_id: owner_id.to_string(),
        area_name: interval.area_name.clone(),
        department_code: areas.department_code(&interval.area_name).map(str::to_string),
        entry_time: interval.entry_time,
        exit_time: interval.exit_time,
        duration_seconds: micros as f64 / 1_000_000.0,
    })
}

/// Persists one completed interval.
///
/// Zero and negative intervals are dropped and yield `Ok(None)`. Storage
/// errors are returned unchanged.
pub fn record<S: LogStore + ?Sized>(interval: &CompletedInterval, owner_id: &str, areas: &AreaTable, store: &S) -> Result<Option<EntryId>> {
    let Some(entry) = to_log_entry(interval, owner_id, areas) else {
        debug!(
            owner = owner_id,
            area = %interval.area_name,
            entry = %interval.entry_time,
            exit = %interval.exit_time,
            "dropping non-positive interval"
        );
        return Ok(None);
    };

    let id = store.append_log_entry(&entry)?;
    debug!(owner = owner_id, area = %entry.area_name, seconds = entry.duration_seconds, id, "interval recorded");
    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::store::{end_of_day, start_of_day, MemoryStore};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(seconds: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(8, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn interval(area: &str, from: i64, to: i64) -> CompletedInterval {
        CompletedInterval {
            area_name: area.to_string(),
            entry_time: at(from),
            exit_time: at(to),
        }
    }

    #[test]
    fn records_with_department_code() {
        let store = MemoryStore::new();
        let areas = AreaTable::default();

        let id = record(&interval("Training", 600, 1800), "alice", &areas, &store).unwrap();
        assert!(id.is_some());

        let date = at(0).date();
        let rows = store.query_log_entries("alice", start_of_day(date), end_of_day(date)).unwrap();
        let entry = rows[0].as_ref().unwrap();
        assert_eq!(entry.department_code.as_deref(), Some("TRAIN"));
        assert_eq!(entry.duration_seconds, 1200.0);
    }

    #[test]
    fn idle_and_unknown_areas_have_no_code() {
        let areas = AreaTable::default();
        let idle = to_log_entry(&interval(areas.idle_label(), 0, 10), "alice", &areas).unwrap();
        assert_eq!(idle.department_code, None);

        let unknown = to_log_entry(&interval("Moon Base", 0, 10), "alice", &areas).unwrap();
        assert_eq!(unknown.area_name, "Moon Base");
        assert_eq!(unknown.department_code, None);
    }

    #[test]
    fn non_positive_intervals_are_dropped() {
        let store = MemoryStore::new();
        let areas = AreaTable::default();

        assert_eq!(record(&interval("Breaks", 5, 5), "alice", &areas, &store).unwrap(), None);
        assert_eq!(record(&interval("Breaks", 5, 2), "alice", &areas, &store).unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn sub_second_durations_are_exact() {
        let areas = AreaTable::default();
        let mut iv = interval("Breaks", 0, 0);
        iv.exit_time = iv.entry_time + Duration::microseconds(1_500_250);
        let entry = to_log_entry(&iv, "alice", &areas).unwrap();
        assert_eq!(entry.duration_seconds, 1.50025);
    }
}
