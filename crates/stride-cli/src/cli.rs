//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use stride_core::FailurePolicy;

/// Stride - forward-only SQL migrations with a durable ledger
#[derive(Parser, Debug)]
#[command(name = "stride")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new Stride project
    Init(InitArgs),

    /// Create the next numbered migration script
    New(NewArgs),

    /// Apply all pending migrations
    Up(UpArgs),

    /// Show applied and pending migrations
    Status(StatusArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Name of the project directory to create
    pub name: String,

    /// Database path written into the generated stride.yml
    #[arg(long, default_value = "./stride.duckdb")]
    pub database_path: String,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Short description, becomes part of the file name
    pub description: String,
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Override the on-failure policy from stride.yml
    #[arg(long, value_enum)]
    pub on_failure: Option<FailureMode>,

    /// List the pending backlog without applying anything
    #[arg(long)]
    pub dry_run: bool,
}

/// On-failure policy selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Halt the run at the first failed script
    Stop,
    /// Attempt every remaining script despite earlier failures
    Continue,
}

impl From<FailureMode> for FailurePolicy {
    fn from(mode: FailureMode) -> Self {
        match mode {
            FailureMode::Stop => FailurePolicy::Stop,
            FailureMode::Continue => FailurePolicy::Continue,
        }
    }
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
