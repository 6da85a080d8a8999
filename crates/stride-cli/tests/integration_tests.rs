//! Integration tests for Stride
//!
//! Drives a real temp project (stride.yml + migrations directory) through
//! the library crates, against file-backed DuckDB databases.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use stride_core::{Config, DirectorySource, FailurePolicy, RunStatus};
use stride_db::{Database, DuckDbBackend};
use stride_migrate::{Ledger, Migrator, MigratorOptions};
use tempfile::TempDir;

/// Create a project directory with a stride.yml and the given scripts.
fn setup_project(scripts: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("stride.yml"),
        "name: integration_project\ndatabase:\n  path: ./app.duckdb\n",
    )
    .unwrap();
    let migrations = dir.path().join("migrations");
    fs::create_dir(&migrations).unwrap();
    for (name, sql) in scripts {
        fs::write(migrations.join(name), sql).unwrap();
    }
    dir
}

fn open_project_db(config: &Config, root: &Path) -> Arc<dyn Database> {
    Arc::new(DuckDbBackend::new(&config.database_path_absolute(root)).unwrap())
}

fn project_migrator(config: &Config, root: &Path, db: Arc<dyn Database>) -> Migrator {
    let source = DirectorySource::new(config.scripts_path_absolute(root)).unwrap();
    Migrator::new(
        db,
        Box::new(source),
        MigratorOptions {
            ledger_table: config.ledger_table.clone(),
            on_failure: config.on_failure,
        },
    )
    .unwrap()
}

#[test]
fn test_load_generated_project_config() {
    let dir = setup_project(&[]);
    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config.name, "integration_project");
    assert_eq!(config.scripts_path, "migrations");
    assert_eq!(config.on_failure, FailurePolicy::Stop);
}

#[tokio::test]
async fn test_full_run_against_file_database() {
    let dir = setup_project(&[
        ("0001_users.sql", "CREATE TABLE users (id INT, email VARCHAR);"),
        ("0002_posts.sql", "CREATE TABLE posts (id INT, user_id INT);"),
        ("0003_seed.sql", "INSERT INTO users VALUES (1, 'a@b.c');"),
    ]);
    let config = Config::load(dir.path()).unwrap();
    let db = open_project_db(&config, dir.path());
    let migrator = project_migrator(&config, dir.path(), Arc::clone(&db));

    let report = migrator.run().await.unwrap();
    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(report.applied.len(), 3);

    let users = db
        .query_opt_i64("SELECT COUNT(*) FROM users")
        .await
        .unwrap();
    assert_eq!(users, Some(1));
}

#[tokio::test]
async fn test_progress_survives_reconnect() {
    let dir = setup_project(&[(
        "0001_users.sql",
        "CREATE TABLE users (id INT); INSERT INTO users VALUES (1);",
    )]);
    let config = Config::load(dir.path()).unwrap();

    {
        let db = open_project_db(&config, dir.path());
        let migrator = project_migrator(&config, dir.path(), db);
        let report = migrator.run().await.unwrap();
        assert_eq!(report.status, RunStatus::Success);
        // drop the connection so the file is not held open
    }

    // Add a second script, reconnect, and run again: only the new one applies
    fs::write(
        dir.path().join("migrations").join("0002_more.sql"),
        "INSERT INTO users VALUES (2);",
    )
    .unwrap();

    let db = open_project_db(&config, dir.path());
    let migrator = project_migrator(&config, dir.path(), Arc::clone(&db));
    let report = migrator.run().await.unwrap();

    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].name, "0002_more.sql");
    let users = db
        .query_opt_i64("SELECT COUNT(*) FROM users")
        .await
        .unwrap();
    assert_eq!(users, Some(2));
}

#[tokio::test]
async fn test_failed_script_reported_and_retried() {
    let dir = setup_project(&[
        ("0001_users.sql", "CREATE TABLE users (id INT);"),
        ("0002_broken.sql", "INSERT INTO nowhere VALUES (1);"),
    ]);
    let config = Config::load(dir.path()).unwrap();
    let db = open_project_db(&config, dir.path());
    let migrator = project_migrator(&config, dir.path(), Arc::clone(&db));

    let report = migrator.run().await.unwrap();
    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "0002_broken.sql");

    // Fix the script in place; the next run picks it up from the same index
    fs::write(
        dir.path().join("migrations").join("0002_broken.sql"),
        "INSERT INTO users VALUES (1);",
    )
    .unwrap();

    let report = migrator.run().await.unwrap();
    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].index, 1);
}

#[tokio::test]
async fn test_custom_ledger_table_from_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("stride.yml"),
        "name: custom_ledger\nledger_table: _audit_migrations\ndatabase:\n  path: \":memory:\"\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("migrations")).unwrap();
    fs::write(
        dir.path().join("migrations").join("0001_t.sql"),
        "CREATE TABLE t (id INT);",
    )
    .unwrap();

    let config = Config::load(dir.path()).unwrap();
    let db = open_project_db(&config, dir.path());
    let migrator = project_migrator(&config, dir.path(), Arc::clone(&db));
    migrator.run().await.unwrap();

    let ledger = Ledger::new(Arc::clone(&db), "_audit_migrations").unwrap();
    assert_eq!(ledger.last_applied_index().await.unwrap(), Some(0));
}
