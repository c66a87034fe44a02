//! Error types for configuration management.

// False positive warnings from thiserror macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type with rich diagnostics.
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    /// Invalid JSON syntax in `cranforge.json`.
    #[error("invalid JSON in {path}: {message}")]
    #[diagnostic(
        code(config::invalid_json),
        help("check JSON syntax at line {line}, column {column}")
    )]
    InvalidJson {
        /// File path.
        path: PathBuf,
        /// Error message.
        message: String,
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        column: usize,
    },

    /// Invalid field value.
    #[error("invalid value for '{field}': {message}")]
    #[diagnostic(code(config::invalid_value), help("{hint}"))]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
        /// Help hint.
        hint: String,
    },

    /// Invalid URL.
    #[error("invalid URL for '{field}': {url}")]
    #[diagnostic(
        code(config::invalid_url),
        help("provide an absolute URL starting with http:// or https://")
    )]
    InvalidUrl {
        /// Field name.
        field: String,
        /// Invalid URL.
        url: String,
    },

    /// Environment variable error.
    #[error("invalid environment variable {var}: {message}")]
    #[diagnostic(code(config::env_error))]
    EnvError {
        /// Variable name.
        var: String,
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error at {path}: {message}")]
    #[diagnostic(code(config::io_error))]
    Io {
        /// File path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Permission denied.
    #[error("permission denied: {path}")]
    #[diagnostic(code(config::permission_denied), help("check file permissions"))]
    PermissionDenied {
        /// File path.
        path: PathBuf,
    },
}

impl ConfigError {
    /// Create an IO error with context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            return Self::PermissionDenied { path };
        }
        Self::Io {
            path,
            message: err.to_string(),
        }
    }

    /// Create a JSON parse error with location.
    #[must_use]
    pub fn json(path: impl Into<PathBuf>, err: &sonic_rs::Error) -> Self {
        Self::InvalidJson {
            path: path.into(),
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }

    /// Create an invalid value error.
    #[must_use]
    pub fn invalid_value(
        field: impl Into<String>,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// The configuration key this error is about, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { field, .. } | Self::InvalidUrl { field, .. } => Some(field),
            Self::EnvError { var, .. } => Some(var),
            _ => None,
        }
    }
}

impl From<ConfigError> for cranforge_core::Error {
    fn from(err: ConfigError) -> Self {
        let key = err.field().map(str::to_string);
        Self::config(key, err.to_string())
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
