//! Cache entry with TTL-based freshness

use std::time::Duration;

use tokio::time::Instant;

use crate::response::FetchResponse;

/// One cached response plus the metadata the freshness check needs.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The normalized response served on cache hits
    pub response: FetchResponse,
    /// Creation or last-refresh time
    pub timestamp: Instant,
    /// A refresh for this key is currently in flight
    pub is_loading: bool,
}

impl CacheEntry {
    /// Create a fresh entry stamped now.
    #[must_use]
    pub fn new(response: FetchResponse) -> Self {
        Self {
            response,
            timestamp: Instant::now(),
            is_loading: false,
        }
    }

    /// Fresh iff the entry is younger than `cache_time`; a zero
    /// `cache_time` means caching is disabled and nothing is ever fresh.
    #[must_use]
    pub fn is_fresh(&self, cache_time: Duration) -> bool {
        !cache_time.is_zero() && self.timestamp.elapsed() <= cache_time
    }

    /// Age of this entry.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.timestamp.elapsed()
    }
}
