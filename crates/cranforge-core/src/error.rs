//! Error types for cranforge operations.
//!
//! Each error has:
//! - A unique error code (e.g., E0101) for easy reference and searching
//! - A clear error message explaining what went wrong
//! - Suggestions for how to fix the issue

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for cranforge errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Identity errors (E01xx)
    /// Malformed package identifier
    E0101,
    /// Malformed dependency specification
    E0104,

    // JSON errors (E04xx)
    /// Invalid JSON syntax or shape
    E0403,

    // IO errors (E05xx)
    /// File not found
    E0501,
    /// Permission denied
    E0502,

    // Cache errors (E06xx)
    /// Cache entry corrupted
    E0601,
    /// Cache directory not writable
    E0602,

    // Configuration errors (E11xx)
    /// Invalid configuration
    E1101,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0104 => "E0104",
            Self::E0403 => "E0403",
            Self::E0501 => "E0501",
            Self::E0502 => "E0502",
            Self::E0601 => "E0601",
            Self::E0602 => "E0602",
            Self::E1101 => "E1101",
        }
    }

    /// Get a brief title for this error code.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::E0101 => "Invalid package id",
            Self::E0104 => "Invalid dependency",
            Self::E0403 => "JSON error",
            Self::E0501 => "File not found",
            Self::E0502 => "Permission denied",
            Self::E0601 => "Cache corrupted",
            Self::E0602 => "Cache not writable",
            Self::E1101 => "Invalid configuration",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for cranforge.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed `group:name` or `group:name:version` identifier.
    #[error("[E0101] malformed package id '{id}'")]
    InvalidPackageId {
        /// The rejected identifier.
        id: String,
        /// Suggestions for fixing.
        suggestions: Vec<String>,
    },

    /// Malformed dependency spec such as `name (>= 1.0`.
    #[error("[E0104] invalid dependency '{spec}': {message}")]
    InvalidDependency {
        /// The rejected spec.
        spec: String,
        /// What was wrong with it.
        message: String,
        /// Suggestions for fixing.
        suggestions: Vec<String>,
    },

    /// JSON error.
    #[error("[E0403] json error: {0}")]
    Json(#[from] sonic_rs::Error),

    /// IO error.
    #[error("[{code}] io error at {path}: {message}")]
    Io {
        /// Error code.
        #[source]
        code: ErrorCodeSource,
        /// File path.
        path: PathBuf,
        /// Error message.
        message: String,
        /// Suggestions for fixing.
        suggestions: Vec<String>,
    },

    /// Cache error.
    #[error("[{code}] cache error: {message}")]
    Cache {
        /// Error code.
        #[source]
        code: ErrorCodeSource,
        /// Error message.
        message: String,
        /// Suggestions for fixing.
        suggestions: Vec<String>,
    },

    /// Configuration error.
    #[error("[{code}] config error: {message}")]
    Config {
        /// Error code.
        #[source]
        code: ErrorCodeSource,
        /// Error message.
        message: String,
        /// Configuration key.
        key: Option<String>,
        /// Suggestions for fixing.
        suggestions: Vec<String>,
    },
}

/// Wrapper to make `ErrorCode` usable as a source.
#[derive(Debug)]
pub struct ErrorCodeSource(pub ErrorCode);

impl fmt::Display for ErrorCodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

impl std::error::Error for ErrorCodeSource {}

impl Error {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidPackageId { .. } => ErrorCode::E0101,
            Self::InvalidDependency { .. } => ErrorCode::E0104,
            Self::Json(_) => ErrorCode::E0403,
            Self::Io { code, .. } => code.0,
            Self::Cache { code, .. } => code.0,
            Self::Config { code, .. } => code.0,
        }
    }

    /// Get suggestions for fixing this error.
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::InvalidPackageId { suggestions, .. }
            | Self::InvalidDependency { suggestions, .. }
            | Self::Io { suggestions, .. }
            | Self::Cache { suggestions, .. }
            | Self::Config { suggestions, .. } => suggestions,
            Self::Json(_) => &[],
        }
    }

    /// Create an IO error with context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let (code, suggestions) = match err.kind() {
            std::io::ErrorKind::NotFound => (
                ErrorCode::E0501,
                vec![
                    format!("Check if the path exists: {}", path.display()),
                    "Verify the universe root passed with --universe".to_string(),
                ],
            ),
            std::io::ErrorKind::PermissionDenied => (
                ErrorCode::E0502,
                vec![
                    format!("Check permissions on: {}", path.display()),
                    "On Unix, check file ownership with 'ls -la'".to_string(),
                ],
            ),
            _ => (
                ErrorCode::E0501,
                vec![format!("Check the file: {}", path.display())],
            ),
        };
        Self::Io {
            code: ErrorCodeSource(code),
            path,
            message: err.to_string(),
            suggestions,
        }
    }

    /// Create a malformed package id error.
    #[must_use]
    pub fn invalid_package_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::InvalidPackageId {
            suggestions: vec![
                "Package versions are written as group:name:version".to_string(),
                format!("Example: {}:survey:3.35-1", crate::PackageId::CRAN_GROUP),
            ],
            id,
        }
    }

    /// Create an invalid dependency spec error.
    #[must_use]
    pub fn invalid_dependency(spec: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDependency {
            spec: spec.into(),
            message: message.into(),
            suggestions: vec![
                "Dependencies are written as 'name' or 'name (>= version)'".to_string(),
            ],
        }
    }

    /// Create a cache error.
    #[must_use]
    pub fn cache(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Cache {
            code: ErrorCodeSource(if message.contains("permission") {
                ErrorCode::E0602
            } else {
                ErrorCode::E0601
            }),
            message,
            suggestions: vec![
                "Delete the cached .dependencies.json file and retry".to_string(),
                "Check cache directory permissions".to_string(),
            ],
        }
    }

    /// Create a config error for a specific key.
    #[must_use]
    pub fn config(key: Option<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut suggestions = vec!["Check cranforge.json and CRANFORGE_* variables".to_string()];
        if let Some(ref k) = key {
            suggestions.insert(0, format!("Fix the value of '{k}'"));
        }
        Self::Config {
            code: ErrorCodeSource(ErrorCode::E1101),
            message,
            key,
            suggestions,
        }
    }

    /// Format the error with suggestions for display.
    #[must_use]
    pub fn display_with_suggestions(&self) -> String {
        let mut output = format!("{self}");
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\n\nSuggestions:");
            for suggestion in suggestions {
                output.push_str("\n  - ");
                output.push_str(suggestion);
            }
        }
        output
    }
}

/// Result type for cranforge operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::E0101.as_str(), "E0101");
        assert_eq!(ErrorCode::E0101.title(), "Invalid package id");
    }

    #[test]
    fn test_invalid_package_id() {
        let err = Error::invalid_package_id("survey");
        assert_eq!(err.code(), ErrorCode::E0101);
        assert!(err.to_string().contains("[E0101]"));
        assert!(err.to_string().contains("survey"));
    }

    #[test]
    fn test_io_error_code_detection() {
        let not_found = Error::io(
            "/nope",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(not_found.code(), ErrorCode::E0501);

        let denied = Error::io(
            "/root",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no"),
        );
        assert_eq!(denied.code(), ErrorCode::E0502);
    }

    #[test]
    fn test_config_error_names_key() {
        let err = Error::config(Some("workers".into()), "must be at least 1");
        assert_eq!(err.code(), ErrorCode::E1101);
        assert!(err.suggestions()[0].contains("workers"));
    }

    #[test]
    fn test_display_with_suggestions() {
        let err = Error::invalid_dependency("x (>= 1", "unterminated version");
        let display = err.display_with_suggestions();
        assert!(display.contains("Suggestions:"));
        assert!(display.contains("name (>= version)"));
    }
}
