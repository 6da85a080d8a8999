//! stride-migrate - Migration engine for Stride
//!
//! Provides the [`Ledger`] (durable record of applied migrations) and the
//! [`Migrator`] (the ordered, transactional apply loop). The engine consumes
//! a database through the `stride_db::Database` trait and a script list
//! through `stride_core::ScriptSource`, so both can be faked in tests.

pub mod error;
pub mod ledger;
pub mod migrator;

pub use error::{MigrateError, MigrateResult};
pub use ledger::Ledger;
pub use migrator::{Migrator, MigratorOptions};
