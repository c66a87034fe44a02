//! Cache statistics tracking.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic cache statistics.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    hits: AtomicU64,
    /// Number of lookups with no stored document.
    misses: AtomicU64,
    /// Number of stored documents that failed to deserialize.
    corrupt: AtomicU64,
    /// Number of documents written.
    writes: AtomicU64,
    /// Number of failed writes.
    write_failures: AtomicU64,
    /// Total bytes read from cache.
    bytes_read: AtomicU64,
    /// Total bytes written to cache.
    bytes_written: AtomicU64,
}

impl CacheStats {
    /// Create new stats tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit.
    pub fn record_hit(&self, bytes: u64) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a cache miss.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a corrupt entry, which also counts as a miss.
    pub fn record_corrupt(&self) {
        self.corrupt.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful write.
    pub fn record_write(&self, bytes: u64) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a failed write.
    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of stats.
    #[must_use]
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        CacheStatsSnapshot {
            hits,
            misses,
            hit_rate,
            corrupt: self.corrupt.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of cache statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatsSnapshot {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses, corrupt entries included.
    pub misses: u64,
    /// Hit rate (0.0 - 1.0).
    pub hit_rate: f64,
    /// Corrupt entries seen.
    pub corrupt: u64,
    /// Documents written.
    pub writes: u64,
    /// Failed writes.
    pub write_failures: u64,
    /// Total bytes read.
    pub bytes_read: u64,
    /// Total bytes written.
    pub bytes_written: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate() {
        let stats = CacheStats::new();
        stats.record_hit(10);
        stats.record_miss();
        stats.record_corrupt();
        stats.record_hit(5);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.hits, 2);
        assert_eq!(snapshot.misses, 2);
        assert_eq!(snapshot.corrupt, 1);
        assert_eq!(snapshot.bytes_read, 15);
        assert!((snapshot.hit_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_hit_rate_is_zero() {
        assert!(CacheStats::new().snapshot().hit_rate.abs() < f64::EPSILON);
    }
}
