//! Shared state for command execution.

use anyhow::{Context as _, Result};
use cranforge_cache::DependencyCache;
use cranforge_config::{Config, ConfigLoader, ConfigSource};
use cranforge_graph::{Blocklist, PackageGraphBuilder, ReplacedPackageProvider};
use cranforge_repository::{ClientConfig, PackageDatabaseClient};
use std::path::Path;
use tracing::debug;

/// Resolved configuration for one universe.
#[derive(Debug)]
pub struct Context {
    /// Effective configuration.
    pub config: Config,
}

impl Context {
    /// Load configuration for `universe`, defaulting to the working directory.
    pub fn new(universe: Option<&Path>, workers: Option<usize>) -> Result<Self> {
        let root = match universe {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().context("reading working directory")?,
        };

        let mut config = ConfigLoader::new(&root)?.load()?;
        if let Some(workers) = workers {
            config.workers = workers;
            debug!(source = ConfigSource::Cli.description(), workers, "loaded configuration layer");
        }
        let config = ConfigLoader::finish(config)?;

        debug!(
            universe = %config.universe_root.display(),
            package_db = %config.package_db_url,
            workers = config.workers,
            "configuration ready"
        );
        Ok(Self { config })
    }

    /// HTTP client for the package database.
    pub fn client(&self) -> Result<PackageDatabaseClient> {
        Ok(PackageDatabaseClient::new(ClientConfig::from(&self.config))?)
    }

    /// Dependency cache for the configured model.
    pub fn cache(&self) -> DependencyCache {
        DependencyCache::new(self.config.cache_root(), &self.config.cache_model)
    }

    /// Replacement builds under the universe.
    pub fn replacements(&self) -> Result<ReplacedPackageProvider> {
        let dir = self.config.replacements_dir();
        ReplacedPackageProvider::scan(&dir)
            .with_context(|| format!("scanning replacements in {}", dir.display()))
    }

    /// Graph builder wired to the package database.
    pub fn graph_builder(&self) -> Result<PackageGraphBuilder<PackageDatabaseClient>> {
        let packages = self.config.packages_dir();
        let blocklist = Blocklist::load(&packages)
            .with_context(|| format!("loading package lists from {}", packages.display()))?;

        Ok(PackageGraphBuilder::new(
            self.client()?,
            self.cache(),
            self.replacements()?,
            blocklist,
            self.config.workers,
        ))
    }
}
