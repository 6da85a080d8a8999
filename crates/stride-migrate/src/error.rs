//! Error types for the migration engine.

use stride_db::DbError;
use thiserror::Error;

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// A script's SQL body failed to execute (M001).
    #[error("[M001] Migration {index} ({name}) failed: {source}")]
    ScriptFailed {
        index: i64,
        name: String,
        #[source]
        source: DbError,
    },

    /// The ledger append failed after the script itself succeeded (M002).
    #[error("[M002] Failed to record migration {index} ({name}): {source}")]
    LedgerWriteFailed {
        index: i64,
        name: String,
        #[source]
        source: DbError,
    },

    /// Transaction bracketing failed around a script (M003).
    #[error("[M003] Transaction failed for migration {index} ({name}): {source}")]
    Transaction {
        index: i64,
        name: String,
        #[source]
        source: DbError,
    },

    /// Ledger schema creation or read failed (M004).
    #[error("[M004] Ledger access failed: {0}")]
    Ledger(#[source] DbError),

    /// Script source enumeration failed (M005).
    #[error("[M005] Script source error: {0}")]
    Source(#[from] stride_core::CoreError),

    /// Ledger table name is not a plain SQL identifier (M006).
    #[error("[M006] Invalid ledger table name: {0}")]
    InvalidTableName(String),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
