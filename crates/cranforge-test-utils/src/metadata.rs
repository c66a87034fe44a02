//! In-memory metadata source for graph-builder tests.

use async_trait::async_trait;
use cranforge_core::{
    AHashMap, Mutex, PackageDependency, PackageVersionId, ResolvedDependency,
    ResolvedDependencySet,
};
use cranforge_repository::{MetadataSource, RepositoryError, Result};
use std::time::Duration;

/// A [`MetadataSource`] answering from a fixed table and counting calls.
#[derive(Debug, Default)]
pub struct StaticMetadataSource {
    packages: AHashMap<PackageVersionId, ResolvedDependencySet>,
    failures: AHashMap<PackageVersionId, u16>,
    lists: AHashMap<String, Vec<PackageVersionId>>,
    delay: Option<Duration>,
    calls: Mutex<AHashMap<PackageVersionId, usize>>,
}

impl StaticMetadataSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` with the given dependency entries.
    #[must_use]
    pub fn with_package(mut self, id: PackageVersionId, deps: Vec<ResolvedDependency>) -> Self {
        self.packages.insert(id, ResolvedDependencySet::new(deps));
        self
    }

    /// Make resolution of `id` fail with an HTTP `status`.
    #[must_use]
    pub fn with_failure(mut self, id: PackageVersionId, status: u16) -> Self {
        self.failures.insert(id, status);
        self
    }

    /// Register the result of a package list query.
    #[must_use]
    pub fn with_package_list(mut self, filter: &str, ids: Vec<PackageVersionId>) -> Self {
        self.lists.insert(filter.to_string(), ids);
        self
    }

    /// Sleep before answering each resolution, to interleave tasks.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of resolution calls made for `id`.
    #[must_use]
    pub fn calls_for(&self, id: &PackageVersionId) -> usize {
        self.calls.lock().get(id).copied().unwrap_or(0)
    }

    /// Total resolution calls.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

#[async_trait]
impl MetadataSource for StaticMetadataSource {
    async fn resolve_dependencies(&self, id: &PackageVersionId) -> Result<ResolvedDependencySet> {
        *self.calls.lock().entry(id.clone()).or_insert(0) += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(&status) = self.failures.get(id) {
            return Err(RepositoryError::Network {
                url: id.path(),
                message: format!("status {status}"),
                status: Some(status),
            });
        }
        // Packages nobody registered have no dependencies.
        Ok(self.packages.get(id).cloned().unwrap_or_default())
    }

    async fn resolve_unqualified(
        &self,
        dependencies: &[PackageDependency],
    ) -> Result<Vec<PackageVersionId>> {
        Ok(dependencies
            .iter()
            .filter_map(|dep| {
                self.packages
                    .keys()
                    .filter(|id| id.name() == dep.name())
                    .max()
                    .cloned()
            })
            .collect())
    }

    async fn resolve_suggests(
        &self,
        dependencies: &[PackageDependency],
    ) -> Result<ResolvedDependencySet> {
        let resolved = self.resolve_unqualified(dependencies).await?;
        Ok(dependencies
            .iter()
            .map(|dep| {
                resolved.iter().find(|id| id.name() == dep.name()).map_or_else(
                    || ResolvedDependency::unresolved(dep.name(), true),
                    |id| ResolvedDependency::resolved(id.clone(), true),
                )
            })
            .collect())
    }

    async fn query_package_list(&self, filter: &str) -> Result<Vec<PackageVersionId>> {
        Ok(self.lists.get(filter).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cran, dep};

    #[tokio::test]
    async fn counts_calls_per_package() {
        let a = cran("a", "1.0");
        let source = StaticMetadataSource::new().with_package(a.clone(), vec![dep("b", "1.0")]);
        let set = source.resolve_dependencies(&a).await.unwrap();
        assert_eq!(set.len(), 1);
        source.resolve_dependencies(&cran("zz", "1")).await.unwrap();
        assert_eq!(source.calls_for(&a), 1);
        assert_eq!(source.total_calls(), 2);
    }

    #[tokio::test]
    async fn suggests_are_optional() {
        let source = StaticMetadataSource::new().with_package(cran("knitr", "1.20"), vec![]);
        let set = source
            .resolve_suggests(&[
                PackageDependency::new("knitr"),
                PackageDependency::new("nowhere"),
            ])
            .await
            .unwrap();
        assert!(set.iter().all(|d| d.optional));
        assert!(set.dependencies[0].is_version_resolved());
        assert!(!set.dependencies[1].is_version_resolved());
    }
}
