//! Error types for frameworkgen.
//!
//! Library crates use [`FrameworkError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all frameworkgen operations.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to the spreadsheet export endpoint.
    #[error("network error: {0}")]
    Network(String),

    /// The sheet answered with a login page or an auth status instead of CSV.
    #[error("access denied for {sheet} sheet: {message}")]
    AccessDenied { sheet: String, message: String },

    /// CSV or YAML parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (missing column, bad identifier, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A stage input file does not exist.
    #[error("input not found at {path:?} ({hint})")]
    MissingInput { path: PathBuf, hint: String },

    /// Template loading or rendering error.
    #[error("template error: {0}")]
    Template(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FrameworkError>;

impl FrameworkError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// A stage input is missing; `hint` tells the user which command produces it.
    pub fn missing_input(path: impl Into<PathBuf>, hint: impl Into<String>) -> Self {
        Self::MissingInput {
            path: path.into(),
            hint: hint.into(),
        }
    }

    pub fn access_denied(sheet: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::AccessDenied {
            sheet: sheet.into(),
            message: msg.into(),
        }
    }
}
