//! Package database access for cranforge.
//!
//! [`MetadataSource`] is the seam the graph builder resolves through;
//! [`PackageDatabaseClient`] implements it over the package database's
//! HTTP+JSON API, retrying server errors.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod source;

pub use client::{ClientConfig, ClientStats, PackageDatabaseClient};
pub use error::{RepositoryError, Result};
pub use source::MetadataSource;
