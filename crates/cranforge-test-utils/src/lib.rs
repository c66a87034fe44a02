//! Testing utilities for cranforge.
//!
//! # Modules
//!
//! - [`fixtures`]: shorthand identities and dependency entries
//! - [`metadata`]: an in-memory [`MetadataSource`](cranforge_repository::MetadataSource)
//! - [`mock_server`]: a wiremock package database
//! - [`universe`]: temporary universe roots on disk

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod fixtures;
pub mod metadata;
pub mod mock_server;
pub mod universe;

/// Re-export commonly used testing utilities.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::metadata::StaticMetadataSource;
    pub use crate::mock_server::MockPackageDatabase;
    pub use crate::universe::{TempUniverse, TempUniverseBuilder};
}
