//! Persistent cache of resolved dependency sets.
//!
//! One pretty-printed JSON document per package version, stored at
//! `<root>/<model>/<name>/<name>_<version>.dependencies.json`.
//!
//! The cache is best effort: a missing, unreadable or corrupt document is a
//! miss, and a failed write is logged and otherwise ignored. Keys are
//! independent, so concurrent readers and writers need no coordination;
//! writes go through a temporary file and a rename so a reader never sees a
//! partially written document.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod stats;

pub use stats::{CacheStats, CacheStatsSnapshot};

use cranforge_core::{
    Error, PackageVersionId, ResolvedDependencySet, Result, from_json_slice, to_json_pretty,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Cache of resolved dependency sets keyed by package version.
#[derive(Debug)]
pub struct DependencyCache {
    dir: PathBuf,
    stats: CacheStats,
}

impl DependencyCache {
    /// Create a cache storing documents under `<root>/<model>`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>, model: &str) -> Self {
        Self {
            dir: root.as_ref().join(model),
            stats: CacheStats::new(),
        }
    }

    /// Directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document for `id`.
    #[must_use]
    pub fn path_for(&self, id: &PackageVersionId) -> PathBuf {
        self.dir
            .join(id.name())
            .join(format!("{}_{}.dependencies.json", id.name(), id.version()))
    }

    /// Cache statistics.
    #[must_use]
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The cached set for exactly `id`, or `None` if absent or unreadable.
    pub async fn get(&self, id: &PackageVersionId) -> Option<ResolvedDependencySet> {
        let path = self.path_for(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                trace!(package = %id, error = %e, "dependency cache miss");
                self.stats.record_miss();
                return None;
            }
        };

        match from_json_slice::<ResolvedDependencySet>(&bytes) {
            Ok(set) => {
                trace!(package = %id, "dependency cache hit");
                self.stats.record_hit(bytes.len() as u64);
                Some(set)
            }
            Err(e) => {
                trace!(
                    package = %id,
                    path = %path.display(),
                    error = %e,
                    "ignoring corrupt cache entry"
                );
                self.stats.record_corrupt();
                None
            }
        }
    }

    /// Store `set` for `id`. Failures are logged and swallowed.
    pub async fn put(&self, id: &PackageVersionId, set: &ResolvedDependencySet) {
        let path = self.path_for(id);
        let result = match to_json_pretty(set) {
            Ok(json) => {
                let len = json.len() as u64;
                write_atomic(path.clone(), json).await.map(|()| len)
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(len) => {
                trace!(package = %id, "cached dependency set");
                self.stats.record_write(len);
            }
            Err(e) => {
                warn!(
                    package = %id,
                    path = %path.display(),
                    error = %e,
                    "failed to cache dependency set"
                );
                self.stats.record_write_failure();
            }
        }
    }
}

async fn write_atomic(path: PathBuf, contents: String) -> Result<()> {
    tokio::task::spawn_blocking(move || write_atomic_blocking(&path, contents.as_bytes()))
        .await
        .map_err(|e| Error::cache(format!("cache write task failed: {e}")))?
}

fn write_atomic_blocking(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::cache(format!("{} has no parent directory", path.display())))?;
    std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;
    file.write_all(contents)
        .map_err(|e| Error::io(file.path(), e))?;
    file.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
