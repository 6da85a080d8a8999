//! stride-core - Core library for Stride
//!
//! This crate provides shared types, configuration parsing, migration script
//! discovery, and run reporting used across all Stride components.

pub mod config;
pub mod error;
pub mod report;
pub mod script;

pub use config::{Config, DatabaseConfig, FailurePolicy};
pub use error::{CoreError, CoreResult};
pub use report::{AppliedMigration, FailedMigration, RunReport, RunStatus};
pub use script::{DirectorySource, MigrationScript, ScriptSource};
