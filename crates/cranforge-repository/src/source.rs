//! The metadata source abstraction consumed by the graph builder.

use crate::error::Result;
use async_trait::async_trait;
use cranforge_core::{PackageDependency, PackageVersionId, ResolvedDependencySet};
use std::sync::Arc;

/// Something that can resolve package dependencies.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Resolved dependency set of one package version.
    async fn resolve_dependencies(&self, id: &PackageVersionId) -> Result<ResolvedDependencySet>;

    /// Pin unqualified `{name, versionRange}` dependencies to concrete versions.
    async fn resolve_unqualified(
        &self,
        dependencies: &[PackageDependency],
    ) -> Result<Vec<PackageVersionId>>;

    /// Resolve the given names as optional (`Suggests`) dependencies.
    async fn resolve_suggests(
        &self,
        dependencies: &[PackageDependency],
    ) -> Result<ResolvedDependencySet>;

    /// Package versions whose name matches `filter`.
    async fn query_package_list(&self, filter: &str) -> Result<Vec<PackageVersionId>>;
}

#[async_trait]
impl<T: MetadataSource + ?Sized> MetadataSource for Arc<T> {
    async fn resolve_dependencies(&self, id: &PackageVersionId) -> Result<ResolvedDependencySet> {
        (**self).resolve_dependencies(id).await
    }

    async fn resolve_unqualified(
        &self,
        dependencies: &[PackageDependency],
    ) -> Result<Vec<PackageVersionId>> {
        (**self).resolve_unqualified(dependencies).await
    }

    async fn resolve_suggests(
        &self,
        dependencies: &[PackageDependency],
    ) -> Result<ResolvedDependencySet> {
        (**self).resolve_suggests(dependencies).await
    }

    async fn query_package_list(&self, filter: &str) -> Result<Vec<PackageVersionId>> {
        (**self).query_package_list(filter).await
    }
}
