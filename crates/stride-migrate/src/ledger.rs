//! Persistent ledger of applied migrations.
//!
//! One row per applied script: `i` (position in the script order),
//! `migration` (file name), `applied_at` (timestamp). The maximum `i` is the
//! resumption point for the next run. Entries are only written by the
//! migrator, inside the same transaction as the script they record.

use crate::error::{MigrateError, MigrateResult};
use std::sync::Arc;
use stride_db::{Database, SqlParam};

/// Durable, monotonically-advancing record of applied migrations.
pub struct Ledger {
    db: Arc<dyn Database>,
    table: String,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl Ledger {
    /// Default name of the backing table.
    pub const DEFAULT_TABLE: &'static str = "_migrations";

    /// Create a ledger over `table`. The name must be a plain identifier —
    /// it is interpolated into DDL, unlike row values, which are bound.
    pub fn new(db: Arc<dyn Database>, table: impl Into<String>) -> MigrateResult<Self> {
        let table = table.into();
        if !is_plain_identifier(&table) {
            return Err(MigrateError::InvalidTableName(table));
        }
        Ok(Self { db, table })
    }

    /// The backing table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Idempotently create the backing table. Safe to call on every startup.
    pub async fn ensure_schema(&self) -> MigrateResult<()> {
        self.db
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                     i SMALLINT NOT NULL UNIQUE,
                     migration VARCHAR NOT NULL,
                     applied_at TIMESTAMP NOT NULL DEFAULT now()
                 );",
                self.table
            ))
            .await
            .map_err(MigrateError::Ledger)
    }

    /// Highest applied index, or `None` when nothing has been applied.
    ///
    /// Reflects committed entries only; callers read this outside any open
    /// transaction.
    pub async fn last_applied_index(&self) -> MigrateResult<Option<i64>> {
        self.db
            .query_opt_i64(&format!("SELECT MAX(i) FROM {}", self.table))
            .await
            .map_err(MigrateError::Ledger)
    }

    /// Every applied index in ascending order.
    pub async fn applied_indices(&self) -> MigrateResult<Vec<i64>> {
        self.db
            .query_i64_column(&format!("SELECT i FROM {} ORDER BY i", self.table))
            .await
            .map_err(MigrateError::Ledger)
    }

    /// Append one entry. Must run inside the same open transaction as the
    /// script execution it records, so script effects and ledger advancement
    /// commit atomically.
    pub async fn record_applied(&self, index: i64, name: &str) -> MigrateResult<()> {
        self.db
            .execute_with(
                &format!("INSERT INTO {} (i, migration) VALUES (?, ?)", self.table),
                &[SqlParam::Int(index), SqlParam::Text(name.to_string())],
            )
            .await
            .map_err(|e| MigrateError::LedgerWriteFailed {
                index,
                name: name.to_string(),
                source: e,
            })?;
        Ok(())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*` — what we accept as a table name from config.
fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
