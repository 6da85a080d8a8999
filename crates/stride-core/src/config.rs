//! Configuration types and parsing for stride.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Main project configuration from stride.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Directory containing migration scripts, relative to the project root
    #[serde(default = "default_scripts_path")]
    pub scripts_path: String,

    /// Name of the ledger table that records applied migrations
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,

    /// Output directory for run reports
    #[serde(default = "default_target_path")]
    pub target_path: String,

    /// What to do when a script fails mid-run
    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the DuckDB database file (":memory:" for a transient database)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Policy applied when a migration script fails mid-run.
///
/// `Stop` halts the run at the first failure, leaving later scripts pending
/// for the next run. `Continue` attempts every remaining script anyway,
/// which can leave the ledger non-contiguous: a recorded higher index makes
/// the failed lower one unreachable under max-index resumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Halt the run at the first failed script (default)
    #[default]
    Stop,
    /// Attempt every remaining script despite earlier failures
    Continue,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Stop => write!(f, "stop"),
            FailurePolicy::Continue => write!(f, "continue"),
        }
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_scripts_path() -> String {
    "migrations".to_string()
}

fn default_ledger_table() -> String {
    "_migrations".to_string()
}

fn default_target_path() -> String {
    "target".to_string()
}

fn default_db_path() -> String {
    "./stride.duckdb".to_string()
}

impl Config {
    /// Config file name looked up inside the project directory.
    pub const FILE_NAME: &'static str = "stride.yml";

    /// Load configuration from `<dir>/stride.yml`
    pub fn load(dir: &Path) -> CoreResult<Self> {
        let path = dir.join(Self::FILE_NAME);
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_str(content: &str) -> CoreResult<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "project name must not be empty".to_string(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Absolute scripts directory for a given project root
    pub fn scripts_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.scripts_path)
    }

    /// Absolute target directory for a given project root
    pub fn target_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.target_path)
    }

    /// Absolute database path for a given project root.
    ///
    /// `:memory:` passes through untouched; absolute paths are kept as-is.
    pub fn database_path_absolute(&self, root: &Path) -> String {
        if self.database.path == ":memory:" {
            return self.database.path.clone();
        }
        let path = Path::new(&self.database.path);
        if path.is_absolute() {
            self.database.path.clone()
        } else {
            root.join(path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
