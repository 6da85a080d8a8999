//! Migration script discovery.
//!
//! A [`ScriptSource`] supplies the full ordered list of migration scripts.
//! The ordering contract is part of the interface: re-enumerating must yield
//! already-seen scripts in the same relative order, because the ledger stores
//! positions, not names. [`DirectorySource`] satisfies the contract by
//! sorting `.sql` files lexicographically by file name — the reason migration
//! files carry a `NNNN_description.sql` prefix.

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// One migration script: its position in the total order, its file name,
/// and its SQL body. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    /// 0-based position in the source's ordered list
    pub index: i64,
    /// File name, e.g. `0001_create_users.sql`
    pub name: String,
    /// Raw SQL body, executed verbatim
    pub sql: String,
}

impl MigrationScript {
    /// True when the body contains no statements (empty or whitespace only).
    pub fn is_empty(&self) -> bool {
        self.sql.trim().is_empty()
    }
}

/// Source of the ordered migration script list.
///
/// Implementations must produce a stable total order across calls.
pub trait ScriptSource: Send + Sync {
    /// Enumerate every script in order, reading each body.
    fn scripts(&self) -> CoreResult<Vec<MigrationScript>>;
}

/// Script source backed by a directory of `.sql` files, ordered by file name.
#[derive(Debug)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Create a source over `dir`, failing fast when the path is missing or
    /// not a directory.
    pub fn new(dir: impl Into<PathBuf>) -> CoreResult<Self> {
        let dir = dir.into();
        if !dir.exists() {
            return Err(CoreError::ScriptsDirNotFound {
                path: dir.display().to_string(),
            });
        }
        if !dir.is_dir() {
            return Err(CoreError::ScriptsDirNotADirectory {
                path: dir.display().to_string(),
            });
        }
        Ok(Self { dir })
    }

    /// The directory this source enumerates.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ScriptSource for DirectorySource {
    fn scripts(&self) -> CoreResult<Vec<MigrationScript>> {
        let mut names: Vec<String> = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(|e| CoreError::IoWithPath {
            path: self.dir.display().to_string(),
            source: e,
        })? {
            let entry = entry.map_err(|e| CoreError::IoWithPath {
                path: self.dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if !path.extension().is_some_and(|e| e == "sql") {
                log::debug!("Ignoring non-sql entry {}", path.display());
                continue;
            }
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => names.push(name.to_string()),
                None => {
                    return Err(CoreError::ScriptNameInvalid {
                        path: path.display().to_string(),
                    })
                }
            }
        }

        // File names define migration order; directory enumeration order does not.
        names.sort();

        let mut scripts = Vec::with_capacity(names.len());
        for (index, name) in names.into_iter().enumerate() {
            let path = self.dir.join(&name);
            let sql = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            })?;
            scripts.push(MigrationScript {
                index: index as i64,
                name,
                sql,
            });
        }
        Ok(scripts)
    }
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
