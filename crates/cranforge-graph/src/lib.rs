//! Transitive dependency graph construction for cranforge.
//!
//! Starting from seed packages, [`PackageGraphBuilder`] discovers every
//! package they transitively depend on, stops at packages provided by a
//! [`ReplacedPackageProvider`], and excludes anything that needs a package
//! on the [`Blocklist`] or one the database could not resolve.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod blocklist;
mod builder;
mod error;
mod graph;
mod node;
pub mod package_list;
pub mod replaced;
pub mod sample;
mod stats;

pub use blocklist::Blocklist;
pub use builder::PackageGraphBuilder;
pub use error::{GraphError, Result};
pub use graph::PackageGraph;
pub use node::{DependencyEdge, EdgesFuture, PackageNode};
pub use package_list::PackageListEntry;
pub use replaced::{ALWAYS_BUILD_FROM_SOURCE, ReplacedPackageProvider};
pub use stats::{BuilderStats, BuilderStatsSnapshot};
