#[cfg(test)]
mod tests {
    use arealog::libs::config::{AreaConfig, Config, StorageBackend, StorageConfig, CSV_FILE_NAME, DB_FILE_NAME};
    use arealog::libs::data_storage::DataStorage;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        temp_dir: TempDir,
        config_path: PathBuf,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let config_path = temp_dir.path().join("nested").join("config.json");
            ConfigTestContext { temp_dir, config_path }
        }
    }

    fn area(name: &str, code: Option<&str>) -> AreaConfig {
        AreaConfig {
            name: name.to_string(),
            department_code: code.map(str::to_string),
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_gives_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.idle_label(), "Untracked (Idle)");
        assert_eq!(config.storage_backend(), StorageBackend::Sqlite);

        let table = config.area_table().unwrap();
        assert_eq!(table.areas().len(), 10);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_round_trip(ctx: &mut ConfigTestContext) {
        let config = Config {
            owner: Some("alice".to_string()),
            idle_label: Some("Away".to_string()),
            areas: Some(vec![area("Lab", Some("LAB")), area("Office", None)]),
            storage: Some(StorageConfig {
                backend: StorageBackend::Csv,
                path: Some(ctx.temp_dir.path().join("log.csv")),
            }),
        };
        config.save_to(&ctx.config_path).unwrap();

        let raw = fs::read_to_string(&ctx.config_path).unwrap();
        assert!(raw.contains("\"backend\": \"csv\""));

        let loaded = Config::read_from(&ctx.config_path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.owner(None), "alice");
        assert_eq!(loaded.owner(Some("bob")), "bob");

        let table = loaded.area_table().unwrap();
        assert_eq!(table.idle_label(), "Away");
        assert_eq!(table.department_code("Lab"), Some("LAB"));
        assert_eq!(table.department_code("Office"), None);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_duplicate_areas_are_rejected(ctx: &mut ConfigTestContext) {
        fs::create_dir_all(ctx.config_path.parent().unwrap()).unwrap();
        fs::write(
            &ctx.config_path,
            r#"{ "areas": [ { "name": "Lab" }, { "name": "Lab", "department_code": "X" } ] }"#,
        )
        .unwrap();

        let config = Config::read_from(&ctx.config_path).unwrap();
        assert!(config.area_table().is_err());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_invalid_json_is_an_error(ctx: &mut ConfigTestContext) {
        fs::create_dir_all(ctx.config_path.parent().unwrap()).unwrap();
        fs::write(&ctx.config_path, "{ not json").unwrap();
        assert!(Config::read_from(&ctx.config_path).is_err());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_storage_path_defaults_to_data_dir(ctx: &mut ConfigTestContext) {
        let data = DataStorage::at(ctx.temp_dir.path().join("data"));

        let sqlite = Config::default();
        assert_eq!(sqlite.storage_path(&data).unwrap(), data.base_path().join(DB_FILE_NAME));
        assert!(data.base_path().exists());

        let csv = Config {
            storage: Some(StorageConfig {
                backend: StorageBackend::Csv,
                path: None,
            }),
            ..Config::default()
        };
        assert_eq!(csv.storage_path(&data).unwrap(), data.base_path().join(CSV_FILE_NAME));
    }

    #[test]
    fn test_blank_idle_label_falls_back() {
        let config = Config {
            idle_label: Some("  ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.idle_label(), "Untracked (Idle)");
    }

    #[test]
    fn test_blank_owner_override_falls_back_to_configured_owner() {
        let config = Config {
            owner: Some("alice".to_string()),
            ..Config::default()
        };
        assert_eq!(config.owner(Some("")), "alice");
        assert_eq!(config.owner(Some("   ")), "alice");
        assert_eq!(config.owner(Some("bob")), "bob");

        let blank = Config {
            owner: Some(" ".to_string()),
            ..Config::default()
        };
        assert!(!blank.owner(Some("")).trim().is_empty());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_case_insensitive_and_reserved_areas_are_rejected(ctx: &mut ConfigTestContext) {
        fs::create_dir_all(ctx.config_path.parent().unwrap()).unwrap();

        fs::write(&ctx.config_path, r#"{ "areas": [ { "name": "Lab" }, { "name": "lab" } ] }"#).unwrap();
        assert!(Config::read_from(&ctx.config_path).unwrap().area_table().is_err());

        fs::write(&ctx.config_path, r#"{ "areas": [ { "name": "Lab" }, { "name": "Idle" } ] }"#).unwrap();
        assert!(Config::read_from(&ctx.config_path).unwrap().area_table().is_err());
    }
}
