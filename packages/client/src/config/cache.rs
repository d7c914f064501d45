//! Cache configuration
//!
//! TTL-based response caching is opt-in: `cache_time` of zero (the
//! default) disables the cache entirely and every lookup misses.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RequestConfig;
use crate::response::FetchResponse;

/// Derives a custom cache key from the request URL and effective config.
pub type CacheKeyFn = Arc<dyn Fn(&str, &RequestConfig) -> String + Send + Sync>;

/// Forces a miss-and-refetch when it returns true, without evicting.
pub type CacheBusterFn = Arc<dyn Fn(&str, &RequestConfig) -> bool + Send + Sync>;

/// Vetoes the post-success cache write when it returns true.
pub type SkipCacheFn = Arc<dyn Fn(&FetchResponse, &RequestConfig) -> bool + Send + Sync>;

/// Runtime cache configuration
#[derive(Clone, Default)]
pub struct CacheOptions {
    /// Entry freshness window; zero disables caching
    pub cache_time: Duration,
    /// Custom cache-key derivation; absent uses the built-in key format
    pub cache_key: Option<CacheKeyFn>,
    /// Busts the read path for this call when it returns true
    pub cache_buster: Option<CacheBusterFn>,
    /// Vetoes writing the response into the cache
    pub skip_cache: Option<SkipCacheFn>,
}

impl CacheOptions {
    /// Cache successful responses for `cache_time`.
    #[must_use]
    pub fn for_duration(cache_time: Duration) -> Self {
        Self { cache_time, ..Self::default() }
    }

    /// Whether caching is enabled for this request.
    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.cache_time.is_zero()
    }
}

impl fmt::Debug for CacheOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheOptions")
            .field("cache_time", &self.cache_time)
            .field("cache_key", &self.cache_key.as_ref().map(|_| "<fn>"))
            .field("cache_buster", &self.cache_buster.as_ref().map(|_| "<fn>"))
            .field("skip_cache", &self.skip_cache.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
