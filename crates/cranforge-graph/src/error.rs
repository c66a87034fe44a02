//! Graph construction errors.

use cranforge_core::PackageVersionId;
use cranforge_repository::RepositoryError;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building a package graph.
///
/// Cloneable so a failed resolution can be handed to every reader of the
/// node's shared result.
#[derive(Debug, Clone, Error)]
pub enum GraphError {
    /// A seed was added for a package that is already in the graph.
    #[error("{id} has already been added to the graph")]
    AlreadyAdded {
        /// The rejected seed.
        id: PackageVersionId,
    },

    /// The package database failed to resolve a package's dependencies.
    #[error("failed to resolve dependencies of {id}: {source}")]
    Resolution {
        /// Package being resolved.
        id: PackageVersionId,
        /// Underlying failure.
        #[source]
        source: RepositoryError,
    },

    /// A package list query failed.
    #[error("failed to query package list '{filter}': {source}")]
    Query {
        /// Filter sent to the database.
        filter: String,
        /// Underlying failure.
        #[source]
        source: RepositoryError,
    },

    /// A resolution task panicked or was cancelled.
    #[error("resolution task for {id} did not complete: {message}")]
    TaskFailed {
        /// Package being resolved.
        id: PackageVersionId,
        /// Join error.
        message: String,
    },

    /// Sample rate was negative or not a number.
    #[error("invalid sample rate {rate}: expected a fraction in [0, 1] or a count above 1")]
    InvalidSampleRate {
        /// Rejected rate.
        rate: f64,
    },

    /// Identity, IO or JSON error from the core crate.
    #[error(transparent)]
    Core(Arc<cranforge_core::Error>),
}

impl From<cranforge_core::Error> for GraphError {
    fn from(err: cranforge_core::Error) -> Self {
        Self::Core(Arc::new(err))
    }
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
