//! New command implementation - creates the next numbered migration script

use anyhow::{Context, Result};
use std::fs;

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::load_project;

/// Execute the new command
pub(crate) async fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let (config, root) = load_project(global)?;
    let scripts_dir = config.scripts_path_absolute(&root);
    if !scripts_dir.is_dir() {
        anyhow::bail!(
            "Scripts directory not found: {} (run `stride init` first?)",
            scripts_dir.display()
        );
    }

    let slug = slugify(&args.description);
    if slug.is_empty() {
        anyhow::bail!(
            "Description '{}' contains no usable characters",
            args.description
        );
    }

    let next = next_sequence_number(&scripts_dir)?;
    let file_name = format!("{next:04}_{slug}.sql");
    let path = scripts_dir.join(&file_name);

    fs::write(&path, format!("-- {file_name}\n\n"))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}

/// Lowercase alphanumeric words joined by underscores.
fn slugify(description: &str) -> String {
    description
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// One past the highest `NNNN_` prefix among existing `.sql` files, or 1.
fn next_sequence_number(scripts_dir: &std::path::Path) -> Result<u32> {
    let mut highest = 0u32;
    for entry in fs::read_dir(scripts_dir)
        .with_context(|| format!("Failed to read {}", scripts_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !path.extension().is_some_and(|e| e == "sql") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(prefix) = name.split('_').next() {
            if let Ok(n) = prefix.parse::<u32>() {
                highest = highest.max(n);
            }
        }
    }
    Ok(highest + 1)
}
