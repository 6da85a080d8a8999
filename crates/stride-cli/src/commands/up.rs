//! Up command implementation - applies all pending migrations

use anyhow::{Context, Result};
use stride_core::{DirectorySource, FailurePolicy, RunStatus};
use stride_migrate::{Migrator, MigratorOptions};

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::{
    create_database_connection, load_project, write_json_results, ExitCode,
};

/// Execute the up command
pub(crate) async fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let (config, root) = load_project(global)?;

    let scripts_dir = config.scripts_path_absolute(&root);
    let source = DirectorySource::new(&scripts_dir).context("Invalid script source")?;
    let db = create_database_connection(&config, &root)?;

    let policy: FailurePolicy = args
        .on_failure
        .map(Into::into)
        .unwrap_or(config.on_failure);

    if global.verbose {
        eprintln!(
            "[verbose] Project '{}', scripts at {}, ledger table '{}', on_failure={}",
            config.name,
            scripts_dir.display(),
            config.ledger_table,
            policy
        );
    }

    let migrator = Migrator::new(
        db,
        Box::new(source),
        MigratorOptions {
            ledger_table: config.ledger_table.clone(),
            on_failure: policy,
        },
    )?;

    if args.dry_run {
        let pending = migrator.pending().await?;
        if pending.is_empty() {
            println!("Nothing to apply.");
        } else {
            println!("Would apply {} migration(s):", pending.len());
            for script in &pending {
                println!("  {} {}", script.index, script.name);
            }
        }
        return Ok(());
    }

    let report = migrator.run().await?;

    for applied in &report.applied {
        if applied.empty {
            println!(
                "  \u{2713} {} (empty, recorded only) [{}ms]",
                applied.name, applied.duration_ms
            );
        } else {
            println!("  \u{2713} {} [{}ms]", applied.name, applied.duration_ms);
        }
    }
    for failed in &report.failed {
        println!("  \u{2717} {} - {}", failed.name, failed.error);
    }
    for name in &report.pending {
        println!("  - {name} (not attempted)");
    }

    let results_path = config.target_path_absolute(&root).join("migrate_results.json");
    write_json_results(&results_path, &report)?;
    if global.verbose {
        eprintln!("[verbose] Wrote {}", results_path.display());
    }

    match report.status {
        RunStatus::Noop => println!("Nothing to apply."),
        RunStatus::Success => println!(
            "Applied {} migration(s) in {:.2}s",
            report.applied.len(),
            report.elapsed_secs
        ),
        RunStatus::Failed => {
            println!(
                "Applied {} migration(s), {} failed, {} not attempted",
                report.applied.len(),
                report.failed.len(),
                report.pending.len()
            );
            return Err(ExitCode(1).into());
        }
    }

    Ok(())
}
