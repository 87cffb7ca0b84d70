//! Terminal tables for the report commands.
//!
//! ## Features
//!
//! - **Area list**: ordinal, display name and department code
//! - **Entries**: one row per interval with a per-area total underneath
//! - **Totals and daily series**: hours per area or department, in decimal
//!   hours and `HH:MM:SS`
//! - **Timeline**: intervals in entry order with their group label
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arealog::libs::area::AreaTable;
//! use arealog::libs::view::View;
//!
//! View::areas(&AreaTable::default());
//! ```

use super::aggregate::{sorted_totals, GroupBy, TimelineRow};
use super::area::AreaTable;
use super::formatter::{format_date_time, format_hours, format_seconds, format_time, group_label};
use super::store::LogEntry;
use chrono::NaiveDate;
use prettytable::{row, Table};
use std::collections::{BTreeMap, HashMap};

/// Printers for `prettytable` tables on stdout.
pub struct View {}

impl View {
    pub fn areas(areas: &AreaTable) {
        let mut table = Table::new();

        table.add_row(row!["#", "AREA", "DEPARTMENT"]);
        for area in areas.areas() {
            table.add_row(row![area.ordinal, area.display_name, area.department_code.as_deref().unwrap_or("-")]);
        }
        table.printstd();
    }

    /// Entries of one day with a per-area total underneath.
    pub fn entries(entries: &[LogEntry]) {
        let mut table = Table::new();

        table.add_row(row!["AREA", "DEPARTMENT", "ENTRY", "EXIT", "DURATION"]);
        for entry in entries {
            table.add_row(row![
                entry.area_name,
                entry.department_code.as_deref().unwrap_or("-"),
                format_time(&entry.entry_time),
                format_time(&entry.exit_time),
                format_seconds(entry.duration_seconds)
            ]);
        }
        let total: f64 = entries.iter().map(|e| e.duration_seconds).sum();
        table.add_row(row!["", "", "", "TOTAL", format_seconds(total)]);
        table.printstd();
    }

    pub fn totals(totals: &HashMap<String, f64>, group_by: GroupBy) {
        let mut table = Table::new();

        table.add_row(row![group_by.label().to_uppercase(), "HOURS", "HH:MM:SS"]);
        for (key, hours) in sorted_totals(totals) {
            table.add_row(row![group_label(&key), format_hours(hours), format_seconds(hours * 3600.0)]);
        }
        let total: f64 = totals.values().sum();
        table.add_row(row!["TOTAL", format_hours(total), format_seconds(total * 3600.0)]);
        table.printstd();
    }

    pub fn daily(series: &BTreeMap<NaiveDate, HashMap<String, f64>>, group_by: GroupBy) {
        let mut table = Table::new();

        table.add_row(row!["DATE", group_by.label().to_uppercase(), "HOURS"]);
        for (date, totals) in series {
            for (key, hours) in sorted_totals(totals) {
                table.add_row(row![date.format("%Y-%m-%d"), group_label(&key), format_hours(hours)]);
            }
            let day_total: f64 = totals.values().sum();
            table.add_row(row![date.format("%Y-%m-%d"), "TOTAL", format_hours(day_total)]);
        }
        table.printstd();
    }

    pub fn timeline(rows: &[TimelineRow], group_by: GroupBy) {
        let mut table = Table::new();

        table.add_row(row![group_by.label().to_uppercase(), "AREA", "ENTRY", "EXIT", "DURATION"]);
        for row in rows {
            table.add_row(row![
                group_label(&row.group_key),
                row.area_name,
                format_date_time(&row.entry_time),
                format_date_time(&row.exit_time),
                format_seconds(row.duration_seconds)
            ]);
        }
        table.printstd();
    }
}
