//! Error types for stride-core

use thiserror::Error;

/// Core error type for Stride
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Scripts directory not found
    #[error("[E004] Scripts directory not found: {path}")]
    ScriptsDirNotFound { path: String },

    /// E005: Scripts path exists but is not a directory
    #[error("[E005] Scripts path is not a directory: {path}")]
    ScriptsDirNotADirectory { path: String },

    /// E006: Script file name is not valid UTF-8
    #[error("[E006] Script file name is not valid UTF-8: {path}")]
    ScriptNameInvalid { path: String },

    /// E007: IO error with file path context
    #[error("[E007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
