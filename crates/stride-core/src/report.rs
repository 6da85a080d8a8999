//! Structured results of a migration run.
//!
//! [`RunReport`] is the value returned from the migrator's apply loop:
//! per-script failures are collected here rather than aborting the run, so
//! callers always see exactly which scripts were applied, which failed, and
//! which were left pending.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every attempted script was applied
    Success,
    /// At least one script failed
    Failed,
    /// Nothing to do - the backlog was empty
    Noop,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::Failed => write!(f, "failed"),
            RunStatus::Noop => write!(f, "noop"),
        }
    }
}

/// A migration applied during this run
#[derive(Debug, Clone, Serialize)]
pub struct AppliedMigration {
    /// Ledger index
    pub index: i64,

    /// Script file name
    pub name: String,

    /// How long the script took to apply (in milliseconds)
    pub duration_ms: u64,

    /// True when the body was empty and only the ledger row was written
    pub empty: bool,
}

/// A migration that failed during this run
#[derive(Debug, Clone, Serialize)]
pub struct FailedMigration {
    /// Ledger index the script would have been recorded under
    pub index: i64,

    /// Script file name
    pub name: String,

    /// Error message
    pub error: String,
}

/// Result of one migration run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique identifier for this run
    pub run_id: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub elapsed_secs: f64,

    /// Scripts applied and recorded, in order
    pub applied: Vec<AppliedMigration>,

    /// Scripts that failed and were rolled back, in order
    pub failed: Vec<FailedMigration>,

    /// Scripts never attempted because the run stopped early
    pub pending: Vec<String>,

    /// Overall outcome
    pub status: RunStatus,
}

impl RunReport {
    /// Create a new empty report for a run starting now
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string()[..8].to_string(),
            started_at: Utc::now(),
            elapsed_secs: 0.0,
            applied: Vec::new(),
            failed: Vec::new(),
            pending: Vec::new(),
            status: RunStatus::Noop,
        }
    }

    /// Record a successfully applied script
    pub fn mark_applied(&mut self, index: i64, name: &str, duration_ms: u64, empty: bool) {
        self.applied.push(AppliedMigration {
            index,
            name: name.to_string(),
            duration_ms,
            empty,
        });
    }

    /// Record a failed, rolled-back script
    pub fn mark_failed(&mut self, index: i64, name: &str, error: &str) {
        self.failed.push(FailedMigration {
            index,
            name: name.to_string(),
            error: error.to_string(),
        });
    }

    /// Record a script left unattempted after an early stop
    pub fn mark_pending(&mut self, name: &str) {
        self.pending.push(name.to_string());
    }

    /// Finalize the report: compute elapsed time and the overall status
    pub fn finish(&mut self) {
        self.elapsed_secs = (Utc::now() - self.started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        self.status = if !self.failed.is_empty() {
            RunStatus::Failed
        } else if !self.applied.is_empty() {
            RunStatus::Success
        } else {
            RunStatus::Noop
        };
    }

    /// Highest index applied during this run, if any
    pub fn last_applied(&self) -> Option<i64> {
        self.applied.iter().map(|m| m.index).max()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
