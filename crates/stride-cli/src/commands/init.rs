//! Init command implementation - scaffolds a new Stride project

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::cli::InitArgs;

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs) -> Result<()> {
    // Reject names that could cause path traversal or confusing directory names
    if args.name.contains('/')
        || args.name.contains('\\')
        || args.name.contains("..")
        || args.name.starts_with('.')
        || args.name.starts_with('-')
    {
        anyhow::bail!(
            "Invalid project name '{}': must not contain '/', '\\', '..', or start with '.' or '-'",
            args.name
        );
    }

    let project_dir = Path::new(&args.name);

    if project_dir.exists() {
        anyhow::bail!(
            "Directory '{}' already exists. Choose a different project name.",
            args.name
        );
    }

    println!("Creating new Stride project: {}\n", args.name);

    fs::create_dir_all(project_dir.join("migrations"))
        .with_context(|| format!("Failed to create directory: {}", args.name))?;

    // Generate stride.yml
    // Escape YAML special characters in interpolated values
    let safe_name = args.name.replace('"', "\\\"");
    let safe_db_path = args.database_path.replace('"', "\\\"");
    let config_content = format!(
        r#"name: "{safe_name}"
version: "1.0.0"

scripts_path: migrations
ledger_table: _migrations
target_path: target

# stop: halt the run at the first failed script (recommended)
# continue: attempt every remaining script despite earlier failures
on_failure: stop

database:
  path: "{safe_db_path}"
"#
    );
    let config_path = project_dir.join("stride.yml");
    fs::write(&config_path, config_content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    // Seed the migrations directory with a first numbered script
    let first_script = "\
-- 0001_init.sql
--
-- Migration scripts run in file-name order, each inside its own
-- transaction. Replace this with your first schema change.

CREATE TABLE example (
    id INTEGER NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT now()
);
";
    let script_path = project_dir.join("migrations").join("0001_init.sql");
    fs::write(&script_path, first_script)
        .with_context(|| format!("Failed to write {}", script_path.display()))?;

    println!("  Created {}", config_path.display());
    println!("  Created {}", script_path.display());
    println!("\nNext steps:");
    println!("  cd {}", args.name);
    println!("  stride up");

    Ok(())
}
