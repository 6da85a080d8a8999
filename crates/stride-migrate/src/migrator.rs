//! The migration apply loop.
//!
//! The [`Migrator`] owns ordering, per-script atomicity, and the failure
//! policy. Each pending script runs inside its own transaction together with
//! the ledger row that records it; there is no larger transaction spanning
//! multiple scripts. Scripts apply strictly one at a time in increasing
//! index order.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::Ledger;
use std::sync::Arc;
use std::time::Instant;
use stride_core::{FailurePolicy, MigrationScript, RunReport, ScriptSource};
use stride_db::Database;

/// Options controlling a [`Migrator`].
#[derive(Debug, Clone)]
pub struct MigratorOptions {
    /// Name of the ledger table
    pub ledger_table: String,

    /// What to do when a script fails mid-run
    pub on_failure: FailurePolicy,
}

impl Default for MigratorOptions {
    fn default() -> Self {
        Self {
            ledger_table: Ledger::DEFAULT_TABLE.to_string(),
            on_failure: FailurePolicy::Stop,
        }
    }
}

/// Drives the apply loop over a database and a script source.
///
/// The migrator exclusively owns what to run next; the ledger is the single
/// source of truth for progress. Concurrent runners are unsupported — two
/// instances advancing the same ledger can corrupt its contiguous-index
/// invariant.
pub struct Migrator {
    db: Arc<dyn Database>,
    source: Box<dyn ScriptSource>,
    ledger: Ledger,
    on_failure: FailurePolicy,
}

impl Migrator {
    /// Create a migrator over an open database and a script source.
    pub fn new(
        db: Arc<dyn Database>,
        source: Box<dyn ScriptSource>,
        options: MigratorOptions,
    ) -> MigrateResult<Self> {
        let ledger = Ledger::new(Arc::clone(&db), options.ledger_table)?;
        Ok(Self {
            db,
            source,
            ledger,
            on_failure: options.on_failure,
        })
    }

    /// The ledger this migrator records progress in.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The backlog: every script whose index exceeds the last applied one.
    ///
    /// Creates the ledger schema if needed, but applies nothing.
    pub async fn pending(&self) -> MigrateResult<Vec<MigrationScript>> {
        self.ledger.ensure_schema().await?;
        let last = self.ledger.last_applied_index().await?;
        let start = last.map_or(0, |l| l + 1);
        let scripts = self.source.scripts()?;
        Ok(scripts.into_iter().filter(|s| s.index >= start).collect())
    }

    /// Apply every unapplied script in order.
    ///
    /// Per-script failures are rolled back, recorded in the returned
    /// [`RunReport`], and handled per the failure policy — they never
    /// propagate as `Err`. Only ledger/source access outside the per-script
    /// transactions can fail the call itself.
    pub async fn run(&self) -> MigrateResult<RunReport> {
        let mut report = RunReport::new();

        self.ledger.ensure_schema().await?;
        let last = self.ledger.last_applied_index().await?;
        let scripts = self.source.scripts()?;

        let total = scripts.len() as i64;
        let start = last.map_or(0, |l| l + 1);
        if start >= total {
            // Nothing to do — covers the empty list and a list that shrank
            // below the recorded high-water mark.
            log::debug!(
                "No pending migrations (last applied: {last:?}, {total} known scripts)"
            );
            report.finish();
            return Ok(report);
        }

        log::debug!(
            "Applying migrations {start}..={} on {}",
            total - 1,
            self.db.db_type()
        );

        let mut halted = false;
        for script in &scripts[start as usize..] {
            if halted {
                report.mark_pending(&script.name);
                continue;
            }
            let started = Instant::now();
            match self.apply_one(script).await {
                Ok(()) => {
                    log::debug!("Applied migration {} ({})", script.index, script.name);
                    report.mark_applied(
                        script.index,
                        &script.name,
                        started.elapsed().as_millis() as u64,
                        script.is_empty(),
                    );
                }
                Err(err) => {
                    log::warn!("{err}");
                    report.mark_failed(script.index, &script.name, &err.to_string());
                    if self.on_failure == FailurePolicy::Stop {
                        halted = true;
                    }
                }
            }
        }

        report.finish();
        Ok(report)
    }

    /// Apply one script and its ledger row inside a single transaction.
    async fn apply_one(&self, script: &MigrationScript) -> MigrateResult<()> {
        self.db
            .begin()
            .await
            .map_err(|e| MigrateError::Transaction {
                index: script.index,
                name: script.name.clone(),
                source: e,
            })?;

        match self.apply_in_tx(script).await {
            Ok(()) => {
                if let Err(e) = self.db.commit().await {
                    let _ = self.db.rollback().await;
                    return Err(MigrateError::Transaction {
                        index: script.index,
                        name: script.name.clone(),
                        source: e,
                    });
                }
                Ok(())
            }
            Err(err) => {
                if let Err(rb) = self.db.rollback().await {
                    log::warn!(
                        "Rollback after failed migration {} also failed: {rb}",
                        script.index
                    );
                }
                Err(err)
            }
        }
    }

    /// Statements issued between BEGIN and COMMIT for one script.
    async fn apply_in_tx(&self, script: &MigrationScript) -> MigrateResult<()> {
        if script.is_empty() {
            // An empty body still consumes its index and gets a ledger row,
            // so max-index resumption never sees a gap.
            log::debug!(
                "Migration {} ({}) has an empty body; recording without executing",
                script.index,
                script.name
            );
        } else {
            self.db
                .execute_batch(&script.sql)
                .await
                .map_err(|e| MigrateError::ScriptFailed {
                    index: script.index,
                    name: script.name.clone(),
                    source: e,
                })?;
        }
        self.ledger.record_applied(script.index, &script.name).await
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
