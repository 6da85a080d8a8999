//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, SqlParam};
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", e, path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Execute parameterized SQL synchronously
    fn execute_with_sync(&self, sql: &str, params: &[SqlParam]) -> DbResult<usize> {
        let conn = self.lock()?;
        let values: Vec<duckdb::types::Value> = params
            .iter()
            .map(|p| match p {
                SqlParam::Int(v) => duckdb::types::Value::BigInt(*v),
                SqlParam::Text(s) => duckdb::types::Value::Text(s.clone()),
            })
            .collect();
        conn.execute(sql, duckdb::params_from_iter(values))
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Query a single optional integer synchronously
    fn query_opt_i64_sync(&self, sql: &str) -> DbResult<Option<i64>> {
        let conn = self.lock()?;
        match conn.query_row(sql, [], |row| row.get::<_, Option<i64>>(0)) {
            Ok(value) => Ok(value),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::QueryError(e.to_string())),
        }
    }

    /// Query an integer column synchronously
    fn query_i64_column_sync(&self, sql: &str) -> DbResult<Vec<i64>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    fn transaction_stmt_sync(&self, stmt: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(stmt)
            .map_err(|e| DbError::TransactionError(format!("{stmt} failed: {e}")))
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_with(&self, sql: &str, params: &[SqlParam]) -> DbResult<usize> {
        self.execute_with_sync(sql, params)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query_opt_i64(&self, sql: &str) -> DbResult<Option<i64>> {
        self.query_opt_i64_sync(sql)
    }

    async fn query_i64_column(&self, sql: &str) -> DbResult<Vec<i64>> {
        self.query_i64_column_sync(sql)
    }

    async fn begin(&self) -> DbResult<()> {
        self.transaction_stmt_sync("BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_stmt_sync("COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_stmt_sync("ROLLBACK")
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory() {
        let db = DuckDbBackend::in_memory().unwrap();
        assert_eq!(db.db_type(), "duckdb");
    }

    #[tokio::test]
    async fn test_open_file_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.duckdb");
        assert!(!path.exists());
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute("CREATE TABLE t (id INT)").await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_memory_path_special_case() {
        let db = DuckDbBackend::new(":memory:").unwrap();
        db.execute("CREATE TABLE t (id INT)").await.unwrap();
    }

    #[tokio::test]
    async fn test_execute_batch() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE t1 (id INT); CREATE TABLE t2 (id INT); INSERT INTO t1 VALUES (1);",
        )
        .await
        .unwrap();

        let count = db
            .query_opt_i64("SELECT COUNT(*) FROM t1")
            .await
            .unwrap();
        assert_eq!(count, Some(1));
    }

    #[tokio::test]
    async fn test_execute_with_binds_values() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute("CREATE TABLE logs (i BIGINT, msg VARCHAR)")
            .await
            .unwrap();

        // A single quote in the text must not break the statement
        db.execute_with(
            "INSERT INTO logs (i, msg) VALUES (?, ?)",
            &[SqlParam::Int(7), SqlParam::Text("it's fine".to_string())],
        )
        .await
        .unwrap();

        let count = db
            .query_opt_i64("SELECT COUNT(*) FROM logs WHERE i = 7 AND msg = 'it''s fine'")
            .await
            .unwrap();
        assert_eq!(count, Some(1));
    }

    #[tokio::test]
    async fn test_query_opt_i64_null_and_empty() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute("CREATE TABLE t (id BIGINT)").await.unwrap();

        // MAX over an empty table is NULL
        let max = db.query_opt_i64("SELECT MAX(id) FROM t").await.unwrap();
        assert_eq!(max, None);

        // No rows at all
        let none = db
            .query_opt_i64("SELECT id FROM t WHERE id = 42")
            .await
            .unwrap();
        assert_eq!(none, None);

        db.execute("INSERT INTO t VALUES (3), (9)").await.unwrap();
        let max = db.query_opt_i64("SELECT MAX(id) FROM t").await.unwrap();
        assert_eq!(max, Some(9));
    }

    #[tokio::test]
    async fn test_query_i64_column() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch("CREATE TABLE t (id BIGINT); INSERT INTO t VALUES (2), (0), (1);")
            .await
            .unwrap();

        let ids = db
            .query_i64_column("SELECT id FROM t ORDER BY id")
            .await
            .unwrap();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_commit_makes_writes_visible() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute("CREATE TABLE t (id INT)").await.unwrap();

        db.begin().await.unwrap();
        db.execute("INSERT INTO t VALUES (1)").await.unwrap();
        db.commit().await.unwrap();

        let count = db.query_opt_i64("SELECT COUNT(*) FROM t").await.unwrap();
        assert_eq!(count, Some(1));
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute("CREATE TABLE t (id INT)").await.unwrap();

        db.begin().await.unwrap();
        db.execute("INSERT INTO t VALUES (1)").await.unwrap();
        db.rollback().await.unwrap();

        let count = db.query_opt_i64("SELECT COUNT(*) FROM t").await.unwrap();
        assert_eq!(count, Some(0));
    }
}
