#[cfg(test)]
mod tests {
    use arealog::libs::aggregate::{totals_by_group, DateRange, GroupBy};
    use arealog::libs::csv_store::CsvLogFile;
    use arealog::libs::export::{ExportData, ExportFormat, Exporter};
    use arealog::libs::session::{JsonSessionFile, SessionStore};
    use arealog::libs::store::{end_of_day, start_of_day, LogEntry, LogStore};
    use arealog::libs::timer::SessionTimerState;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct CsvTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
    }

    impl TestContext for CsvTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join("logs").join("time_log.csv");
            CsvTestContext { _temp_dir: temp_dir, path }
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    fn entry(owner: &str, area: &str, code: Option<&str>, from: NaiveDateTime, to: NaiveDateTime) -> LogEntry {
        LogEntry {
            owner_id: owner.to_string(),
            area_name: area.to_string(),
            department_code: code.map(str::to_string),
            entry_time: from,
            exit_time: to,
            duration_seconds: (to - from).num_seconds() as f64,
        }
    }

    fn append_raw(path: &PathBuf, line: &str) {
        append_bytes(path, format!("{}\n", line).as_bytes());
    }

    fn append_bytes(path: &PathBuf, bytes: &[u8]) {
        let mut file = fs::OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(bytes).unwrap();
    }

    #[test_context(CsvTestContext)]
    #[test]
    fn test_open_writes_header(ctx: &mut CsvTestContext) {
        CsvLogFile::open(&ctx.path).unwrap();
        let content = fs::read_to_string(&ctx.path).unwrap();
        assert_eq!(content.lines().next().unwrap(), "Owner,Area,Entry Time,Exit Time,Duration (seconds),Department Code");
    }

    #[test_context(CsvTestContext)]
    #[test]
    fn test_append_and_query(ctx: &mut CsvTestContext) {
        let store = CsvLogFile::open(&ctx.path).unwrap();
        let first = entry("alice", "Training", Some("TRAIN"), ts(8, 0), ts(8, 30));
        let second = entry("alice", "Untracked (Idle)", None, ts(8, 30), ts(9, 0));

        assert_eq!(store.append_log_entry(&first).unwrap(), 1);
        assert_eq!(store.append_log_entry(&second).unwrap(), 2);
        store.append_log_entry(&entry("bob", "Breaks", Some("NPRD"), ts(8, 0), ts(8, 10))).unwrap();

        let rows: Vec<LogEntry> = store
            .query_log_entries("alice", start_of_day(date()), end_of_day(date()))
            .unwrap()
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(rows, vec![first, second]);

        let reopened = CsvLogFile::open(&ctx.path).unwrap();
        assert_eq!(reopened.append_log_entry(&entry("bob", "Breaks", None, ts(9, 0), ts(9, 1))).unwrap(), 4);
    }

    #[test_context(CsvTestContext)]
    #[test]
    fn test_damaged_lines_are_malformed(ctx: &mut CsvTestContext) {
        let store = CsvLogFile::open(&ctx.path).unwrap();
        store.append_log_entry(&entry("alice", "Training", Some("TRAIN"), ts(8, 0), ts(9, 0))).unwrap();
        append_raw(&ctx.path, "alice,Breaks,2025-03-10 09:00:00");
        append_raw(&ctx.path, "alice,Breaks,2025-03-10 09:00:00,2025-03-10 09:10:00,ten minutes,NPRD");
        append_raw(&ctx.path, "bob,Breaks,2025-03-10 09:00:00,2025-03-10 09:10:00,600,NPRD");

        let rows = store.query_log_entries("alice", start_of_day(date()), end_of_day(date())).unwrap();
        assert_eq!(rows.len(), 3);
        let lines: Vec<i64> = rows.iter().filter_map(|r| r.as_ref().err()).map(|e| e.row).collect();
        assert_eq!(lines, vec![3, 4]);

        let totals = totals_by_group("alice", &DateRange::day(date()), GroupBy::Department, &store).unwrap();
        assert_eq!(totals.skipped, 2);
        assert!((totals.value["TRAIN"] - 1.0).abs() < 1e-9);
    }

    #[test_context(CsvTestContext)]
    #[test]
    fn test_delete_rewrites_file(ctx: &mut CsvTestContext) {
        let store = CsvLogFile::open(&ctx.path).unwrap();
        store.append_log_entry(&entry("alice", "Breaks", None, ts(8, 0), ts(8, 5))).unwrap();
        store.append_log_entry(&entry("bob", "Breaks", None, ts(8, 0), ts(8, 5))).unwrap();
        store.append_log_entry(&entry("alice", "Breaks", None, ts(9, 0), ts(9, 5))).unwrap();

        assert_eq!(store.delete_log_entries("alice").unwrap(), 2);
        let content = fs::read_to_string(&ctx.path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().nth(1).unwrap().starts_with("bob,"));

        assert_eq!(store.delete_all_log_entries().unwrap(), 1);
        let content = fs::read_to_string(&ctx.path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert_eq!(store.append_log_entry(&entry("alice", "Breaks", None, ts(10, 0), ts(10, 5))).unwrap(), 1);
    }

    #[test_context(CsvTestContext)]
    #[test]
    fn test_json_session_file(ctx: &mut CsvTestContext) {
        let sessions = JsonSessionFile::new(ctx.path.with_extension("sessions.json"));
        assert_eq!(sessions.load("alice", "Idle").unwrap(), SessionTimerState::new("Idle"));

        let state = SessionTimerState::new("Idle").start(ts(8, 0)).state.switch_area("Breaks", ts(8, 15)).state;
        sessions.save("alice", &state).unwrap();
        sessions.save("bob", &SessionTimerState::new("Idle")).unwrap();

        assert_eq!(sessions.load("alice", "Idle").unwrap(), state);
        assert!(!sessions.load("bob", "Idle").unwrap().is_active());
    }

    #[test_context(CsvTestContext)]
    #[test]
    fn test_delete_keeps_other_owners_undecodable_rows(ctx: &mut CsvTestContext) {
        let store = CsvLogFile::open(&ctx.path).unwrap();
        store.append_log_entry(&entry("alice", "Breaks", None, ts(8, 0), ts(8, 5))).unwrap();
        let bob_row: &[u8] = b"bob,Caf\xe9,2025-03-10 09:00:00.000000,2025-03-10 09:10:00.000000,600,NPRD\n";
        append_bytes(&ctx.path, bob_row);

        assert_eq!(store.delete_log_entries("alice").unwrap(), 1);

        let content = fs::read(&ctx.path).unwrap();
        assert!(content.ends_with(bob_row));

        let rows = store.query_log_entries("bob", start_of_day(date()), end_of_day(date())).unwrap();
        assert_eq!(rows.len(), 1);
        let bad = rows[0].as_ref().unwrap_err();
        assert_eq!(bad.row, 2);
        assert!(bad.reason.contains("UTF-8"));
    }

    #[test_context(CsvTestContext)]
    #[test]
    fn test_rows_breaking_entry_invariants_are_malformed(ctx: &mut CsvTestContext) {
        let store = CsvLogFile::open(&ctx.path).unwrap();
        store.append_log_entry(&entry("alice", "Training", Some("TRAIN"), ts(8, 0), ts(9, 0))).unwrap();
        append_raw(&ctx.path, "alice,Breaks,2025-03-10 10:00:00.000000,2025-03-10 10:10:00.000000,-inf,NPRD");
        append_raw(&ctx.path, "alice,Breaks,2025-03-10 11:00:00.000000,2025-03-10 10:50:00.000000,600,NPRD");
        append_raw(&ctx.path, "alice,Breaks,2025-03-10 12:00:00.000000,2025-03-10 12:10:00.000000,1e300,NPRD");

        let rows = store.query_log_entries("alice", start_of_day(date()), end_of_day(date())).unwrap();
        let lines: Vec<i64> = rows.iter().filter_map(|r| r.as_ref().err()).map(|e| e.row).collect();
        assert_eq!(lines, vec![3, 4, 5]);

        let totals = totals_by_group("alice", &DateRange::day(date()), GroupBy::Department, &store).unwrap();
        assert_eq!(totals.skipped, 3);
        assert!((totals.value["TRAIN"] - 1.0).abs() < 1e-9);

        let out = ctx.path.with_file_name("totals.csv");
        let written = Exporter::new(ExportFormat::Csv, Some(out.clone()))
            .export(ExportData::Totals, "alice", &DateRange::day(date()), GroupBy::Department, &store)
            .unwrap();
        assert_eq!(written, vec![out]);
    }

    #[test_context(CsvTestContext)]
    #[test]
    fn test_lock_commit_keeps_appends_and_drop_truncates(ctx: &mut CsvTestContext) {
        let store = CsvLogFile::open(&ctx.path).unwrap();
        store.append_log_entry(&entry("alice", "Breaks", None, ts(8, 0), ts(8, 5))).unwrap();
        let before = fs::read(&ctx.path).unwrap();

        {
            let _lock = store.lock().unwrap();
            assert_eq!(store.append_log_entry(&entry("alice", "Breaks", None, ts(9, 0), ts(9, 5))).unwrap(), 2);
        }
        assert_eq!(fs::read(&ctx.path).unwrap(), before);

        let lock = store.lock().unwrap();
        assert_eq!(store.append_log_entry(&entry("alice", "Training", None, ts(10, 0), ts(10, 5))).unwrap(), 2);
        lock.commit();

        let rows = store.query_log_entries("alice", start_of_day(date()), end_of_day(date())).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].as_ref().unwrap().area_name, "Training");
    }
}
