//! Graph builder statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters updated by resolution tasks.
#[derive(Debug, Default)]
pub struct BuilderStats {
    nodes_created: AtomicU64,
    resolutions: AtomicU64,
    cache_hits: AtomicU64,
    service_calls: AtomicU64,
    replaced: AtomicU64,
    missing: AtomicU64,
    blocked: AtomicU64,
}

impl BuilderStats {
    pub(crate) fn record_node(&self) {
        self.nodes_created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_service_call(&self) {
        self.service_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_replaced(&self) {
        self.replaced.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_missing(&self) {
        self.missing.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_blocked(&self) {
        self.blocked.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of stats.
    #[must_use]
    pub fn snapshot(&self) -> BuilderStatsSnapshot {
        BuilderStatsSnapshot {
            nodes_created: self.nodes_created.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            service_calls: self.service_calls.load(Ordering::Relaxed),
            replaced: self.replaced.load(Ordering::Relaxed),
            missing: self.missing.load(Ordering::Relaxed),
            blocked: self.blocked.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of builder statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuilderStatsSnapshot {
    /// Nodes created, of any kind.
    pub nodes_created: u64,
    /// Resolution tasks started.
    pub resolutions: u64,
    /// Resolutions answered from the dependency cache.
    pub cache_hits: u64,
    /// Resolutions answered by the package database.
    pub service_calls: u64,
    /// Replaced nodes created.
    pub replaced: u64,
    /// Missing placeholder nodes created.
    pub missing: u64,
    /// Nodes blocked, directly or through a dependency.
    pub blocked: u64,
}
