use super::*;

#[test]
fn test_parse_minimal_config() {
    let yaml = r#"
name: test_project
"#;
    let config = Config::from_str(yaml).unwrap();
    assert_eq!(config.name, "test_project");
    assert_eq!(config.version, "1.0.0");
    assert_eq!(config.scripts_path, "migrations");
    assert_eq!(config.ledger_table, "_migrations");
    assert_eq!(config.target_path, "target");
    assert_eq!(config.on_failure, FailurePolicy::Stop);
    assert_eq!(config.database.path, "./stride.duckdb");
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: billing_service
version: "2.1.0"
scripts_path: db/migrations
ledger_table: _billing_migrations
target_path: out
on_failure: continue
database:
  path: ./billing.duckdb
"#;
    let config = Config::from_str(yaml).unwrap();
    assert_eq!(config.name, "billing_service");
    assert_eq!(config.version, "2.1.0");
    assert_eq!(config.scripts_path, "db/migrations");
    assert_eq!(config.ledger_table, "_billing_migrations");
    assert_eq!(config.on_failure, FailurePolicy::Continue);
    assert_eq!(config.database.path, "./billing.duckdb");
}

#[test]
fn test_unknown_field_rejected() {
    let yaml = r#"
name: test_project
rollback_path: down
"#;
    let err = Config::from_str(yaml).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_empty_name_rejected() {
    let yaml = r#"
name: "  "
"#;
    let err = Config::from_str(yaml).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_invalid_failure_policy_rejected() {
    let yaml = r#"
name: test_project
on_failure: retry
"#;
    assert!(Config::from_str(yaml).is_err());
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(Config::FILE_NAME),
        "name: loaded_project\ndatabase:\n  path: \":memory:\"\n",
    )
    .unwrap();

    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config.name, "loaded_project");
    assert_eq!(config.database.path, ":memory:");
}

#[test]
fn test_path_accessors() {
    let yaml = r#"
name: test_project
"#;
    let config = Config::from_str(yaml).unwrap();
    let root = std::path::PathBuf::from("/srv/app");
    assert_eq!(
        config.scripts_path_absolute(&root),
        root.join("migrations")
    );
    assert_eq!(config.target_path_absolute(&root), root.join("target"));
    assert_eq!(
        config.database_path_absolute(&root),
        root.join("./stride.duckdb").display().to_string()
    );
}

#[test]
fn test_memory_database_path_passes_through() {
    let yaml = r#"
name: test_project
database:
  path: ":memory:"
"#;
    let config = Config::from_str(yaml).unwrap();
    let root = std::path::PathBuf::from("/srv/app");
    assert_eq!(config.database_path_absolute(&root), ":memory:");
}

#[test]
fn test_failure_policy_display() {
    assert_eq!(FailurePolicy::Stop.to_string(), "stop");
    assert_eq!(FailurePolicy::Continue.to_string(), "continue");
}
