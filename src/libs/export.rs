//! Export of log entries and aggregates to CSV, JSON and Excel.
//!
//! ```rust,no_run
//! use arealog::libs::aggregate::{DateRange, GroupBy};
//! use arealog::libs::export::{ExportData, ExportFormat, Exporter};
//! use arealog::libs::store::MemoryStore;
//! use chrono::Local;
//!
//! let store = MemoryStore::new();
//! let range = DateRange::day(Local::now().date_naive());
//! let exporter = Exporter::new(ExportFormat::Csv, None);
//! exporter.export(ExportData::Totals, "alice", &range, GroupBy::Area, &store)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::aggregate::{self, DateRange, GroupBy};
use crate::libs::formatter::format_seconds;
use crate::libs::messages::Message;
use crate::libs::store::{format_timestamp, LogStore};
use crate::{msg_info, msg_success, msg_warning};
use anyhow::Result;
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    /// `.xlsx` workbook with a formatted header row.
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportData {
    /// Every log entry in the range.
    Entries,
    /// Hours per group over the whole range.
    Totals,
    /// Hours per day and group.
    Daily,
    /// Entries, totals and daily series together.
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub area: String,
    pub department_code: String,
    pub entry_time: String,
    pub exit_time: String,
    pub duration_seconds: f64,
    pub duration_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportTotal {
    pub group: String,
    pub hours: f64,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDaily {
    pub date: String,
    pub group: String,
    pub hours: f64,
}

const ENTRY_HEADERS: [&str; 6] = ["Area", "Department", "Entry Time", "Exit Time", "Duration (seconds)", "Duration (hours)"];
const TOTAL_HEADERS: [&str; 3] = ["Group", "Hours", "Duration"];
const DAILY_HEADERS: [&str; 3] = ["Date", "Group", "Hours"];

/// A single table ready to be written by any of the formats.
struct Sheet {
    headers: &'static [&'static str],
    rows: Vec<Vec<Cell>>,
}

enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
        }
    }
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Without `output_path` the file is `arealog_export_<YYYYmmdd_HHMMSS>.<ext>`
    /// in the current directory.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let default_name = format!("arealog_export_{}", Local::now().format("%Y%m%d_%H%M%S"));
        let output_path = output_path.unwrap_or_else(|| PathBuf::from(format!("{}.{}", default_name, format.extension())));

        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Exports one data kind and returns the written files.
    pub fn export<S: LogStore + ?Sized>(&self, data: ExportData, owner_id: &str, range: &DateRange, group_by: GroupBy, store: &S) -> Result<Vec<PathBuf>> {
        let written = match data {
            ExportData::Entries => {
                let (entries, skipped) = gather_entries(owner_id, range, store)?;
                report_skipped(skipped);
                self.write_sheet(&self.output_path, &entries_sheet(&entries), &entries)?;
                vec![self.output_path.clone()]
            }
            ExportData::Totals => {
                let (totals, skipped) = gather_totals(owner_id, range, group_by, store)?;
                report_skipped(skipped);
                self.write_sheet(&self.output_path, &totals_sheet(&totals), &totals)?;
                vec![self.output_path.clone()]
            }
            ExportData::Daily => {
                let (daily, skipped) = gather_daily(owner_id, range, group_by, store)?;
                report_skipped(skipped);
                self.write_sheet(&self.output_path, &daily_sheet(&daily), &daily)?;
                vec![self.output_path.clone()]
            }
            ExportData::All => self.export_all(owner_id, range, group_by, store)?,
        };

        for path in &written {
            msg_success!(Message::ExportCompleted(path.display().to_string()));
        }
        Ok(written)
    }

    /// JSON writes one document; CSV and Excel write `_entries`, `_totals`
    /// and `_daily` files next to the output path.
    fn export_all<S: LogStore + ?Sized>(&self, owner_id: &str, range: &DateRange, group_by: GroupBy, store: &S) -> Result<Vec<PathBuf>> {
        msg_info!(Message::ExportingAllData);

        let (entries, skipped) = gather_entries(owner_id, range, store)?;
        let (totals, _) = gather_totals(owner_id, range, group_by, store)?;
        let (daily, _) = gather_daily(owner_id, range, group_by, store)?;
        report_skipped(skipped);

        if let ExportFormat::Json = self.format {
            let all_data = serde_json::json!({
                "export_date": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                "owner": owner_id,
                "from": range.from().to_string(),
                "to": range.to().to_string(),
                "group_by": group_by,
                "entries": entries,
                "totals": totals,
                "daily": daily,
            });
            let json = serde_json::to_string_pretty(&all_data)?;
            File::create(&self.output_path)?.write_all(json.as_bytes())?;
            return Ok(vec![self.output_path.clone()]);
        }

        let base = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "arealog_export".to_string());
        let ext = self.format.extension();

        let entries_path = self.output_path.with_file_name(format!("{}_entries.{}", base, ext));
        let totals_path = self.output_path.with_file_name(format!("{}_totals.{}", base, ext));
        let daily_path = self.output_path.with_file_name(format!("{}_daily.{}", base, ext));

        self.write_sheet(&entries_path, &entries_sheet(&entries), &entries)?;
        self.write_sheet(&totals_path, &totals_sheet(&totals), &totals)?;
        self.write_sheet(&daily_path, &daily_sheet(&daily), &daily)?;

        Ok(vec![entries_path, totals_path, daily_path])
    }

    fn write_sheet<T: Serialize>(&self, path: &Path, sheet: &Sheet, records: &[T]) -> Result<()> {
        match self.format {
            ExportFormat::Csv => write_csv(path, sheet),
            ExportFormat::Json => {
                let json = serde_json::to_string_pretty(records)?;
                File::create(path)?.write_all(json.as_bytes())?;
                Ok(())
            }
            ExportFormat::Excel => write_excel(path, sheet),
        }
    }
}

fn report_skipped(skipped: usize) {
    if skipped > 0 {
        msg_warning!(Message::MalformedRowsSkipped(skipped));
    }
}

pub fn gather_entries<S: LogStore + ?Sized>(owner_id: &str, range: &DateRange, store: &S) -> Result<(Vec<ExportEntry>, usize)> {
    let result = aggregate::entries(owner_id, range, store)?;
    let entries = result
        .value
        .into_iter()
        .map(|e| ExportEntry {
            duration_hours: e.duration_hours(),
            area: e.area_name,
            department_code: e.department_code.unwrap_or_default(),
            entry_time: format_timestamp(&e.entry_time),
            exit_time: format_timestamp(&e.exit_time),
            duration_seconds: e.duration_seconds,
        })
        .collect();
    Ok((entries, result.skipped))
}

pub fn gather_totals<S: LogStore + ?Sized>(owner_id: &str, range: &DateRange, group_by: GroupBy, store: &S) -> Result<(Vec<ExportTotal>, usize)> {
    let result = aggregate::totals_by_group(owner_id, range, group_by, store)?;
    let totals = aggregate::sorted_totals(&result.value)
        .into_iter()
        .map(|(group, hours)| ExportTotal {
            duration: format_seconds(hours * 3600.0),
            group,
            hours,
        })
        .collect();
    Ok((totals, result.skipped))
}

pub fn gather_daily<S: LogStore + ?Sized>(owner_id: &str, range: &DateRange, group_by: GroupBy, store: &S) -> Result<(Vec<ExportDaily>, usize)> {
    let result = aggregate::daily_series(owner_id, range, group_by, store)?;
    let mut daily = Vec::new();
    for (date, totals) in &result.value {
        for (group, hours) in aggregate::sorted_totals(totals) {
            daily.push(ExportDaily {
                date: date.format("%Y-%m-%d").to_string(),
                group,
                hours,
            });
        }
    }
    Ok((daily, result.skipped))
}

fn entries_sheet(entries: &[ExportEntry]) -> Sheet {
    Sheet {
        headers: &ENTRY_HEADERS,
        rows: entries
            .iter()
            .map(|e| {
                vec![
                    Cell::Text(e.area.clone()),
                    Cell::Text(e.department_code.clone()),
                    Cell::Text(e.entry_time.clone()),
                    Cell::Text(e.exit_time.clone()),
                    Cell::Number(e.duration_seconds),
                    Cell::Number(e.duration_hours),
                ]
            })
            .collect(),
    }
}

fn totals_sheet(totals: &[ExportTotal]) -> Sheet {
    Sheet {
        headers: &TOTAL_HEADERS,
        rows: totals
            .iter()
            .map(|t| vec![Cell::Text(t.group.clone()), Cell::Number(t.hours), Cell::Text(t.duration.clone())])
            .collect(),
    }
}

fn daily_sheet(daily: &[ExportDaily]) -> Sheet {
    Sheet {
        headers: &DAILY_HEADERS,
        rows: daily
            .iter()
            .map(|d| vec![Cell::Text(d.date.clone()), Cell::Text(d.group.clone()), Cell::Number(d.hours)])
            .collect(),
    }
}

fn write_csv(path: &Path, sheet: &Sheet) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(sheet.headers)?;
    for row in &sheet.rows {
        wtr.write_record(row.iter().map(Cell::to_text))?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_excel(path: &Path, sheet: &Sheet) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new().set_bold().set_background_color(rust_xlsxwriter::Color::Gray);

    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, cells) in sheet.rows.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, cell) in cells.iter().enumerate() {
            match cell {
                Cell::Text(s) => worksheet.write_string(row, col as u16, s)?,
                Cell::Number(n) => worksheet.write_number(row, col as u16, *n)?,
            };
        }
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}
