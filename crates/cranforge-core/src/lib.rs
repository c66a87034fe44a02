//! Core types for the cranforge package graph tools.
//!
//! This crate provides the vocabulary shared by every other crate:
//! - Package identities ([`PackageId`], [`PackageVersionId`]) and version ordering
//! - The resolved-dependency wire model returned by the package database
//! - Parsing of unqualified dependency specs such as `survey (>= 3.2)`
//! - Coded error types and JSON helpers

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod dependency;
pub mod error;
mod json;
mod package;
mod resolved;
mod version;

pub use dependency::PackageDependency;
pub use error::{Error, ErrorCode, Result};
pub use json::{from_json, from_json_slice, to_json, to_json_pretty};
pub use package::{PackageId, PackageVersionId};
pub use resolved::{ResolvedDependency, ResolvedDependencySet};
pub use version::compare_versions;

// Re-export commonly used types
pub use ahash::{AHashMap, AHashSet};
pub use parking_lot::{Mutex, RwLock};
