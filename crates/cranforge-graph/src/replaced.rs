//! Packages built by an external replacement instead of from CRAN sources.

use crate::error::Result;
use ahash::AHashSet;
use cranforge_core::{Error, PackageVersionId};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Build descriptor marking a replacement directory.
pub const BUILD_DESCRIPTOR: &str = "build.gradle";

/// Packages that are always built from source, even when a replacement exists.
pub const ALWAYS_BUILD_FROM_SOURCE: &[&str] = &["testthat", "Rcpp"];

/// The set of package names with a replacement build.
#[derive(Debug, Clone)]
pub struct ReplacedPackageProvider {
    replaced: BTreeSet<String>,
    always_rebuild: AHashSet<String>,
}

impl ReplacedPackageProvider {
    /// Scan the immediate subdirectories of `root` for build descriptors.
    ///
    /// # Errors
    /// Returns error if `root` cannot be read.
    pub fn scan(root: &Path) -> Result<Self> {
        let mut replaced = BTreeSet::new();
        for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                Error::io(path, e.into())
            })?;
            if entry.file_type().is_dir() && entry.path().join(BUILD_DESCRIPTOR).is_file() {
                replaced.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        debug!(root = %root.display(), count = replaced.len(), "scanned replacements");
        Ok(Self::from_names(replaced))
    }

    /// Build from a list of names.
    #[must_use]
    pub fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            replaced: names.into_iter().map(Into::into).collect(),
            always_rebuild: ALWAYS_BUILD_FROM_SOURCE
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Add a name that is always built from source.
    #[must_use]
    pub fn with_always_rebuild(mut self, name: impl Into<String>) -> Self {
        self.always_rebuild.insert(name.into());
        self
    }

    /// True if a replacement directory exists for `id`'s name.
    #[must_use]
    pub fn is_replaced(&self, id: &PackageVersionId) -> bool {
        self.replaced.contains(id.name())
    }

    /// True if `name` must be built from source regardless of replacements.
    #[must_use]
    pub fn is_always_rebuilt(&self, name: &str) -> bool {
        self.always_rebuild.contains(name)
    }

    /// Whether a dependency on `id` should stop at a replacement.
    ///
    /// `marked_replaced` is the package database's own replacement flag.
    #[must_use]
    pub fn short_circuits(&self, id: &PackageVersionId, marked_replaced: bool) -> bool {
        (marked_replaced || self.is_replaced(id)) && !self.is_always_rebuilt(id.name())
    }

    /// Replaced names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.replaced.iter().map(String::as_str)
    }

    /// Number of replaced names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.replaced.len()
    }

    /// True if nothing is replaced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replaced.is_empty()
    }

    /// `includeBuild` lines for the build settings, in name order.
    #[must_use]
    pub fn include_build_directives(&self) -> Vec<String> {
        self.names()
            .map(|name| format!("includeBuild '../replacements/{name}'"))
            .collect()
    }

    /// Append the `includeBuild` lines to `settings`, one per line.
    pub fn append_include_builds(&self, settings: &mut String) {
        for directive in self.include_build_directives() {
            settings.push_str(&directive);
            settings.push('\n');
        }
    }
}
