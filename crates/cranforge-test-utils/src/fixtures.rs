//! Shorthand constructors for identities and dependency entries.

use cranforge_core::{PackageId, PackageVersionId, ResolvedDependency};

/// A CRAN package version.
#[must_use]
pub fn cran(name: &str, version: &str) -> PackageVersionId {
    PackageVersionId::new(PackageId::CRAN_GROUP, name, version)
}

/// A required dependency on a CRAN package version.
#[must_use]
pub fn dep(name: &str, version: &str) -> ResolvedDependency {
    ResolvedDependency::resolved(cran(name, version), false)
}

/// An optional dependency on a CRAN package version.
#[must_use]
pub fn optional_dep(name: &str, version: &str) -> ResolvedDependency {
    ResolvedDependency::resolved(cran(name, version), true)
}

/// A required dependency the database could not resolve.
#[must_use]
pub fn unresolved_dep(name: &str) -> ResolvedDependency {
    ResolvedDependency::unresolved(name, false)
}

/// A required dependency provided by a replacement build.
#[must_use]
pub fn replaced_dep(name: &str, version: &str, replacement: &str) -> ResolvedDependency {
    dep(name, version).with_replacement(replacement)
}
