//! Status command implementation - shows applied and pending migrations

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use stride_core::{DirectorySource, ScriptSource};
use stride_migrate::Ledger;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{create_database_connection, load_project, print_table};

/// One row of status output
#[derive(Debug, Serialize)]
struct StatusRow {
    index: i64,
    name: String,
    status: &'static str,
}

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let (config, root) = load_project(global)?;

    let scripts_dir = config.scripts_path_absolute(&root);
    let source = DirectorySource::new(&scripts_dir).context("Invalid script source")?;
    let db = create_database_connection(&config, &root)?;

    let ledger = Ledger::new(db, config.ledger_table.clone())?;
    ledger.ensure_schema().await?;
    let applied: HashSet<i64> = ledger.applied_indices().await?.into_iter().collect();
    let scripts = source.scripts()?;

    let rows: Vec<StatusRow> = scripts
        .iter()
        .map(|script| StatusRow {
            index: script.index,
            name: script.name.clone(),
            status: if applied.contains(&script.index) {
                "applied"
            } else {
                "pending"
            },
        })
        .collect();

    match args.output {
        StatusOutput::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        StatusOutput::Table => {
            let table_rows: Vec<Vec<String>> = rows
                .iter()
                .map(|r| vec![r.index.to_string(), r.name.clone(), r.status.to_string()])
                .collect();
            print_table(&["IDX", "MIGRATION", "STATUS"], &table_rows);

            let pending = rows.iter().filter(|r| r.status == "pending").count();
            println!("\n{} applied, {} pending", rows.len() - pending, pending);
        }
    }

    // A gap means an earlier script failed while a later one was recorded;
    // max-index resumption will never revisit it.
    if let Some(max) = applied.iter().max() {
        let gaps: Vec<i64> = (0..=*max).filter(|i| !applied.contains(i)).collect();
        if !gaps.is_empty() {
            eprintln!(
                "[warn] Ledger is non-contiguous, unreachable indices: {gaps:?}"
            );
        }
    }

    Ok(())
}
