#[cfg(test)]
mod tests {
    use arealog::libs::area::AreaTable;
    use arealog::libs::backend::Backend;
    use arealog::libs::clock::ManualClock;
    use arealog::libs::config::{StorageBackend, CSV_FILE_NAME, DB_FILE_NAME};
    use arealog::libs::store::{end_of_day, start_of_day, LogEntry};
    use arealog::libs::timer::SessionTimerState;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    const OWNER: &str = "alice";

    struct BackendTestContext {
        _temp_dir: TempDir,
        sqlite_path: PathBuf,
        csv_path: PathBuf,
        areas: AreaTable,
        clock: ManualClock,
    }

    impl TestContext for BackendTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let sqlite_path = temp_dir.path().join(DB_FILE_NAME);
            let csv_path = temp_dir.path().join(CSV_FILE_NAME);
            BackendTestContext {
                _temp_dir: temp_dir,
                sqlite_path,
                csv_path,
                areas: AreaTable::default(),
                clock: ManualClock::new(ts(8, 0, 0)),
            }
        }
    }

    impl BackendTestContext {
        fn open(&self, kind: StorageBackend) -> Backend {
            let path = match kind {
                StorageBackend::Sqlite => &self.sqlite_path,
                StorageBackend::Csv => &self.csv_path,
            };
            Backend::open_at(kind, path).unwrap()
        }

        fn start(&self, backend: &Backend) {
            self.clock.set(ts(8, 0, 0));
            backend
                .update_session(OWNER, &self.areas, &self.clock, |tracker| Ok(tracker.start()?))
                .unwrap();
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, s).unwrap()
    }

    fn day_rows(backend: &Backend) -> Vec<LogEntry> {
        backend
            .store()
            .query_log_entries(OWNER, start_of_day(date()), end_of_day(date()))
            .unwrap()
            .into_iter()
            .map(|row| row.unwrap())
            .collect()
    }

    #[test_context(BackendTestContext)]
    #[test]
    fn test_second_invocation_resumes_from_saved_state(ctx: &mut BackendTestContext) {
        for kind in StorageBackend::ALL {
            // Both opened before either one updates, like two overlapping CLI runs.
            let first = ctx.open(kind);
            let second = ctx.open(kind);

            ctx.start(&first);

            ctx.clock.set(ts(9, 0, 0));
            first
                .update_session(OWNER, &ctx.areas, &ctx.clock, |tracker| Ok(tracker.switch_area("Training")?))
                .unwrap();

            ctx.clock.set(ts(9, 30, 0));
            let update = second
                .update_session(OWNER, &ctx.areas, &ctx.clock, |tracker| Ok(tracker.switch_area("Breaks")?))
                .unwrap();
            assert_eq!(update.before.current_area(), "Training");
            assert_eq!(update.before.interval_started_at(), Some(ts(9, 0, 0)));

            ctx.clock.set(ts(10, 0, 0));
            first
                .update_session(OWNER, &ctx.areas, &ctx.clock, |tracker| Ok(tracker.stop()?))
                .unwrap();

            let mut rows = day_rows(&first);
            rows.sort_by_key(|e| e.entry_time);
            let spans: Vec<_> = rows.iter().map(|e| (e.area_name.as_str(), e.entry_time, e.exit_time)).collect();
            assert_eq!(
                spans,
                vec![
                    ("Untracked (Idle)", ts(8, 0, 0), ts(9, 0, 0)),
                    ("Training", ts(9, 0, 0), ts(9, 30, 0)),
                    ("Breaks", ts(9, 30, 0), ts(10, 0, 0)),
                ],
                "{} backend",
                kind.name()
            );
            for pair in rows.windows(2) {
                assert!(pair[0].exit_time <= pair[1].entry_time);
            }

            assert!(!second.sessions().load(OWNER, ctx.areas.idle_label()).unwrap().is_active());
        }
    }

    #[test_context(BackendTestContext)]
    #[test]
    fn test_update_fails_when_session_changed_underneath(ctx: &mut BackendTestContext) {
        for kind in StorageBackend::ALL {
            let backend = ctx.open(kind);
            ctx.start(&backend);

            ctx.clock.set(ts(9, 0, 0));
            let result = backend.update_session(OWNER, &ctx.areas, &ctx.clock, |tracker| {
                let id = tracker.switch_area("Training")?;
                // Another invocation stops the timer before this one saves.
                backend.sessions().save(OWNER, &SessionTimerState::new(ctx.areas.idle_label()))?;
                Ok(id)
            });

            let err = result.err().unwrap();
            assert!(err.to_string().contains("changed by another"), "{} backend: {}", kind.name(), err);
            assert!(day_rows(&backend).is_empty(), "{} backend kept the interval", kind.name());

            let saved = backend.sessions().load(OWNER, ctx.areas.idle_label()).unwrap();
            assert_ne!(saved.current_area(), "Training");
        }
    }

    #[test_context(BackendTestContext)]
    #[test]
    fn test_sqlite_rolls_back_session_and_entries_together(ctx: &mut BackendTestContext) {
        let backend = ctx.open(StorageBackend::Sqlite);
        ctx.start(&backend);
        let started = backend.sessions().load(OWNER, ctx.areas.idle_label()).unwrap();

        ctx.clock.set(ts(9, 0, 0));
        let result = backend.update_session(OWNER, &ctx.areas, &ctx.clock, |tracker| {
            tracker.switch_area("Training")?;
            backend.sessions().save(OWNER, &SessionTimerState::new(ctx.areas.idle_label()))?;
            Ok(())
        });
        assert!(result.is_err());

        assert_eq!(backend.sessions().load(OWNER, ctx.areas.idle_label()).unwrap(), started);
        assert!(day_rows(&backend).is_empty());
    }

    #[test_context(BackendTestContext)]
    #[test]
    fn test_failed_update_discards_recorded_interval(ctx: &mut BackendTestContext) {
        for kind in StorageBackend::ALL {
            let backend = ctx.open(kind);
            ctx.start(&backend);

            ctx.clock.set(ts(9, 0, 0));
            let result = backend.update_session(OWNER, &ctx.areas, &ctx.clock, |tracker| {
                tracker.switch_area("Training")?;
                Err::<(), _>(anyhow::anyhow!("interrupted"))
            });
            assert!(result.is_err());
            assert!(day_rows(&backend).is_empty(), "{} backend kept the interval", kind.name());

            let saved = backend.sessions().load(OWNER, ctx.areas.idle_label()).unwrap();
            assert_eq!(saved.current_area(), "Untracked (Idle)");
            assert_eq!(saved.interval_started_at(), Some(ts(8, 0, 0)));

            ctx.clock.advance(Duration::minutes(5));
            backend
                .update_session(OWNER, &ctx.areas, &ctx.clock, |tracker| Ok(tracker.switch_area("Training")?))
                .unwrap();
            let rows = day_rows(&backend);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].exit_time, ts(9, 5, 0));
        }
    }

    #[test_context(BackendTestContext)]
    #[test]
    fn test_future_saved_session_is_reset(ctx: &mut BackendTestContext) {
        let backend = ctx.open(StorageBackend::Sqlite);
        let future = SessionTimerState::restore(ctx.areas.idle_label(), "Training", Some(ts(12, 0, 0)));
        backend.sessions().save(OWNER, &future).unwrap();

        ctx.clock.set(ts(9, 0, 0));
        let update = backend
            .update_session(OWNER, &ctx.areas, &ctx.clock, |tracker| Ok(tracker.state().is_active()))
            .unwrap();
        assert!(!update.value);
        assert_eq!(update.after.current_area(), "Training");
        assert!(!backend.sessions().load(OWNER, ctx.areas.idle_label()).unwrap().is_active());
    }
}
