//! Package database error types.

use thiserror::Error;

/// Errors talking to the package database.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// Non-success HTTP status or transport failure.
    #[error("request to {url} failed: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Error message.
        message: String,
        /// HTTP status, when a response was received.
        status: Option<u16>,
    },

    /// Request timed out.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Response body did not have the expected shape.
    #[error("invalid response from {url}: {message}")]
    InvalidResponse {
        /// Request URL.
        url: String,
        /// Parse error.
        message: String,
    },

    /// URL could not be built.
    #[error("invalid URL {url}: {message}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Client could not be configured.
    #[error("invalid client configuration: {message}")]
    InvalidConfig {
        /// Error message.
        message: String,
    },
}

impl RepositoryError {
    /// True for 5xx responses, the only class that is retried.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Network { status: Some(code), .. } if *code >= 500)
    }

    /// HTTP status, when one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type for package database operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
