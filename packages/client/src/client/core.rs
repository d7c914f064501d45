//! The orchestrating client
//!
//! `FetchClient` owns the cache store, the dedup/cancellation queue, the
//! transport, and the per-client default config. Everything is explicitly
//! constructed and injectable; there is no hidden module-global state, and
//! `clear()` tears down cache and queue for test isolation.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::stats::{ClientStats, ClientStatsSnapshot};
use crate::cache::{CacheEvent, CacheStore};
use crate::config::RequestConfig;
use crate::error::Result;
use crate::queue::RequestQueue;
use crate::response::{FetchResponse, ResponseData};
use crate::transport::{HyperTransport, Transport};

/// Request-orchestration client.
#[derive(Clone)]
pub struct FetchClient {
    pub(super) defaults: RequestConfig,
    pub(super) cache: Arc<CacheStore>,
    pub(super) queue: Arc<RequestQueue>,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) stats: Arc<ClientStats>,
}

impl FetchClient {
    /// Client with the default hyper transport and empty defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HyperTransport::new()))
    }

    /// Client over an injected transport primitive.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            defaults: RequestConfig::default(),
            cache: Arc::new(CacheStore::new()),
            queue: Arc::new(RequestQueue::new()),
            transport,
            stats: Arc::new(ClientStats::new()),
        }
    }

    /// Client with explicit parts; used when cache or queue lifetimes are
    /// managed by the caller.
    #[must_use]
    pub fn with_parts(
        defaults: RequestConfig,
        cache: Arc<CacheStore>,
        queue: Arc<RequestQueue>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            defaults,
            cache,
            queue,
            transport,
            stats: Arc::new(ClientStats::new()),
        }
    }

    /// Replace the per-client default config applied by builders.
    #[must_use]
    pub fn with_defaults(mut self, defaults: RequestConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// The per-client default config; builders start from a clone of this.
    #[must_use]
    pub fn defaults(&self) -> &RequestConfig {
        &self.defaults
    }

    /// The cache store backing this client.
    #[must_use]
    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// The in-flight request queue backing this client.
    #[must_use]
    pub fn queue(&self) -> &Arc<RequestQueue> {
        &self.queue
    }

    /// Counter snapshot for monitoring.
    #[must_use]
    pub fn stats(&self) -> ClientStatsSnapshot {
        self.stats.snapshot()
    }

    /// Read the cached response for `key`, ignoring TTL.
    #[must_use]
    pub fn get_cache(&self, key: &str) -> Option<FetchResponse> {
        self.cache.peek(key).map(|entry| entry.response)
    }

    /// Write a response into the cache under `key`.
    pub fn set_cache(&self, key: &str, response: FetchResponse) {
        self.cache.set(key, response);
    }

    /// Remove the cache entry for `key`.
    pub fn delete_cache(&self, key: &str) -> bool {
        self.cache.delete(key)
    }

    /// Subscribe to key-scoped cache change notifications.
    pub fn subscribe(&self, key: &str) -> broadcast::Receiver<CacheEvent> {
        self.cache.subscribe(key)
    }

    /// Overwrite the cached data for `key` immediately.
    pub fn mutate(&self, key: &str, data: ResponseData) {
        self.cache.mutate(key, data);
    }

    /// Overwrite the cached data, then issue exactly one network refresh
    /// whose result replaces the mutated entry.
    ///
    /// # Errors
    ///
    /// Returns a builder error when `key` has no cached entry to
    /// revalidate, or the refresh's own error per its strategy.
    pub async fn mutate_and_revalidate(
        &self,
        key: &str,
        data: ResponseData,
    ) -> Result<FetchResponse> {
        self.cache.mutate(key, data);
        self.revalidate(key).await
    }

    /// Re-issue the request that produced the entry under `key`, bypassing
    /// the cache read path; the fresh response overwrites the entry.
    ///
    /// # Errors
    ///
    /// Returns a builder error when `key` has no cached entry.
    pub async fn revalidate(&self, key: &str) -> Result<FetchResponse> {
        let entry = self
            .cache
            .peek(key)
            .ok_or_else(|| crate::error::builder(format!("no cache entry for key {key}")))?;

        let url = entry.response.url.clone();
        let mut config = entry.response.config.clone();
        // The stored URL already carries the serialized query
        config.query.clear();
        config.cache.cache_buster = Some(Arc::new(|_: &str, _: &RequestConfig| true));

        self.cache.mark_loading(key, true);
        let result = self.request(&url, config).await;
        self.cache.mark_loading(key, false);
        result
    }

    /// Drop all cached entries and abort everything in flight.
    pub fn clear(&self) {
        self.cache.clear();
        self.queue.clear();
    }
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("defaults", &self.defaults)
            .field("cached_entries", &self.cache.len())
            .field("in_flight", &self.queue.len())
            .finish()
    }
}
