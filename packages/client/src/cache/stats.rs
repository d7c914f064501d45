//! Cache statistics and metrics tracking

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Statistics for the response cache
#[derive(Debug)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: AtomicU64,
    /// Number of cache misses
    pub misses: AtomicU64,
    /// Number of expiry evictions
    pub evictions: AtomicU64,
    /// Number of cache writes (set or refresh)
    pub writes: AtomicU64,
    /// Number of manual mutations
    pub mutations: AtomicU64,
    /// Cache creation time
    pub created_at: Instant,
}

impl CacheStats {
    /// Create new cache statistics
    #[must_use]
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            mutations: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    /// Record a cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an expiry eviction
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a write or refresh
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a manual mutation
    pub fn record_mutation(&self) {
        self.mutations.fetch_add(1, Ordering::Relaxed);
    }

    /// Cache hit ratio over the lifetime of this store
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let misses = self.misses.load(Ordering::Relaxed) as f64;
        if hits + misses == 0.0 {
            0.0
        } else {
            hits / (hits + misses)
        }
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}
