//! Append-only CSV log file.
//!
//! The file starts with a header row followed by one record per log entry:
//!
//! ```text
//! Owner,Area,Entry Time,Exit Time,Duration (seconds),Department Code
//! alice,Training,2025-03-10 08:10:00.000000,2025-03-10 08:30:00.000000,1200,TRAIN
//! ```
//!
//! ## Features
//!
//! - **Append-only writes**: records are never rewritten except by the bulk
//!   delete operations, which replace the whole file
//! - **Byte-level owner matching**: rows are read as raw bytes, so a row that
//!   is not valid UTF-8 still belongs to its owner and survives other owners'
//!   deletes
//! - **Row validation**: rows with the wrong number of fields, unparseable
//!   values or broken entry invariants are reported as [`MalformedRecord`]s
//!   keyed by their line number
//! - **Exclusive updates**: [`CsvLogFile::lock`] takes an advisory lock on a
//!   `.lock` file next to the log; appends made under a lock that is dropped
//!   without [`CsvLogLock::commit`] are truncated away again
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arealog::libs::csv_store::CsvLogFile;
//!
//! let log = CsvLogFile::open("/tmp/time_log.csv")?;
//! let lock = log.lock()?;
//! // append entries, save the session...
//! lock.commit();
//! # Ok::<(), arealog::libs::error::TrackerError>(())
//! ```

use crate::libs::error::{MalformedRecord, Result};
use crate::libs::store::{format_timestamp, parse_timestamp, EntryId, LogEntry, LogStore, RowResult};
use chrono::NaiveDateTime;
use csv::{ByteRecord, ReaderBuilder, StringRecord, WriterBuilder};
use fs4::fs_std::FileExt;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CSV_HEADER: [&str; 6] = ["Owner", "Area", "Entry Time", "Exit Time", "Duration (seconds)", "Department Code"];

pub struct CsvLogFile {
    path: PathBuf,
    /// Number of data rows; also the id handed out for the last append.
    rows: Mutex<EntryId>,
}

impl CsvLogFile {
    /// Opens the log file, creating it with a header row when missing or empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let is_empty = fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
        if is_empty {
            write_records(&path, &[])?;
            debug!(path = %path.display(), "created csv log file");
        }

        let rows = read_records(&path)?.len() as EntryId;
        Ok(Self { path, rows: Mutex::new(rows) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Blocks until this process holds the exclusive lock on the log.
    ///
    /// The lock lives on `<log>.csv.lock` and is released when the returned
    /// guard is dropped, or by the OS if the process dies.
    pub fn lock(&self) -> Result<CsvLogLock<'_>> {
        let lock_path = self.path.with_extension("csv.lock");
        let file = OpenOptions::new().create(true).truncate(false).write(true).open(&lock_path)?;
        file.lock_exclusive()?;

        let log_len = fs::metadata(&self.path)?.len();
        let rows = *self.rows.lock();
        debug!(path = %lock_path.display(), "csv log locked");

        Ok(CsvLogLock {
            log: self,
            _file: file,
            log_len,
            rows,
            committed: false,
        })
    }
}

/// Exclusive hold on a [`CsvLogFile`]. Dropping it without [`commit`](Self::commit)
/// truncates the log back to its length at lock time.
pub struct CsvLogLock<'a> {
    log: &'a CsvLogFile,
    _file: File,
    log_len: u64,
    rows: EntryId,
    committed: bool,
}

impl CsvLogLock<'_> {
    pub fn commit(mut self) {
        self.committed = true;
    }

    fn rollback(&self) -> Result<()> {
        let len = fs::metadata(&self.log.path)?.len();
        if len > self.log_len {
            OpenOptions::new().write(true).open(&self.log.path)?.set_len(self.log_len)?;
        }
        *self.log.rows.lock() = self.rows;
        Ok(())
    }
}

impl Drop for CsvLogLock<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match self.rollback() {
            Ok(()) => debug!(path = %self.log.path.display(), "uncommitted csv appends rolled back"),
            Err(e) => warn!(path = %self.log.path.display(), error = %e, "failed to roll back csv appends"),
        }
    }
}

impl LogStore for CsvLogFile {
    fn append_log_entry(&self, entry: &LogEntry) -> Result<EntryId> {
        let mut rows = self.rows.lock();

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
        wtr.write_record(&[
            entry.owner_id.clone(),
            entry.area_name.clone(),
            format_timestamp(&entry.entry_time),
            format_timestamp(&entry.exit_time),
            entry.duration_seconds.to_string(),
            entry.department_code.clone().unwrap_or_default(),
        ])?;
        wtr.flush()?;

        *rows += 1;
        Ok(*rows)
    }

    fn query_log_entries(&self, owner_id: &str, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<RowResult>> {
        let _guard = self.rows.lock();
        let mut out = Vec::new();

        for (line, record) in read_records(&self.path)? {
            if !is_owned_by(&record, owner_id) {
                continue;
            }
            match parse_record(line, record) {
                Ok(entry) if entry.entry_time < from || entry.entry_time > to => {}
                row => out.push(row),
            }
        }

        Ok(out)
    }

    fn delete_log_entries(&self, owner_id: &str) -> Result<usize> {
        let mut rows = self.rows.lock();

        let records = read_records(&self.path)?;
        let total = records.len();
        let kept: Vec<ByteRecord> = records
            .into_iter()
            .map(|(_, record)| record)
            .filter(|record| !is_owned_by(record, owner_id))
            .collect();

        write_records(&self.path, &kept)?;
        *rows = kept.len() as EntryId;
        Ok(total - kept.len())
    }

    fn delete_all_log_entries(&self) -> Result<usize> {
        let mut rows = self.rows.lock();

        let total = read_records(&self.path)?.len();
        write_records(&self.path, &[])?;
        *rows = 0;
        Ok(total)
    }
}

/// Owner comparison on the raw first field.
fn is_owned_by(record: &ByteRecord, owner_id: &str) -> bool {
    record.get(0) == Some(owner_id.as_bytes())
}

/// Reads every data record as raw bytes with its line number.
fn read_records(path: &Path) -> Result<Vec<(i64, ByteRecord)>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut rdr = ReaderBuilder::new().has_headers(true).flexible(true).from_path(path)?;
    let mut out = Vec::new();
    let mut record = ByteRecord::new();
    let mut fallback_line = 1;
    while rdr.read_byte_record(&mut record)? {
        fallback_line += 1;
        let line = record.position().map(|p| p.line() as i64).unwrap_or(fallback_line);
        out.push((line, record.clone()));
    }
    Ok(out)
}

/// Rewrites the file with the header followed by `records`, byte for byte.
fn write_records(path: &Path, records: &[ByteRecord]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    {
        let mut wtr = WriterBuilder::new().flexible(true).from_path(&tmp)?;
        wtr.write_record(CSV_HEADER)?;
        for record in records {
            wtr.write_byte_record(record)?;
        }
        wtr.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn parse_record(line: i64, record: ByteRecord) -> RowResult {
    let record = StringRecord::from_byte_record(record).map_err(|e| MalformedRecord::new(line, format!("invalid UTF-8: {}", e)))?;

    if record.len() != CSV_HEADER.len() {
        return Err(MalformedRecord::new(
            line,
            format!("expected {} fields, found {}", CSV_HEADER.len(), record.len()),
        ));
    }

    let field = |index: usize| record.get(index).unwrap_or_default().trim();
    let required = |index: usize| {
        let value = field(index);
        if value.is_empty() {
            Err(MalformedRecord::new(line, format!("missing {}", CSV_HEADER[index])))
        } else {
            Ok(value)
        }
    };
    let timestamp = |index: usize| {
        let value = required(index)?;
        parse_timestamp(value).ok_or_else(|| MalformedRecord::new(line, format!("invalid {}: {}", CSV_HEADER[index], value)))
    };

    let owner_id = required(0)?.to_string();
    let area_name = required(1)?.to_string();
    let entry_time = timestamp(2)?;
    let exit_time = timestamp(3)?;
    let duration_seconds = required(4)?
        .parse::<f64>()
        .map_err(|_| MalformedRecord::new(line, format!("invalid {}: {}", CSV_HEADER[4], field(4))))?;
    let department_code = Some(field(5)).filter(|c| !c.is_empty()).map(str::to_string);

    LogEntry {
        owner_id,
        area_name,
        department_code,
        entry_time,
        exit_time,
        duration_seconds,
    }
    .validate(line)
}
