//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// A SQL parameter bound at execution time.
///
/// The ledger insert binds the script name through here so it is always
/// treated as a value, never reinterpreted as SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// 64-bit integer value
    Int(i64),
    /// Text value
    Text(String),
}

/// Database abstraction trait for Stride
///
/// Implementations must be Send + Sync for async operation. Transactions are
/// connection-scoped: `begin` opens one, and every `execute*` call until the
/// matching `commit`/`rollback` runs inside it.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single SQL statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute a single SQL statement with bound parameters
    async fn execute_with(&self, sql: &str, params: &[SqlParam]) -> DbResult<usize>;

    /// Execute multiple SQL statements as one batch
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Query a single integer value from the first row, `None` when the
    /// result is empty or NULL
    async fn query_opt_i64(&self, sql: &str) -> DbResult<Option<i64>>;

    /// Query the first column of every row as integers
    async fn query_i64_column(&self, sql: &str) -> DbResult<Vec<i64>>;

    /// Open an explicit transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
