//! Core `FetchBuilder` structure and orchestration setters
//!
//! The builder only assembles a `RequestConfig`; every knob maps onto one
//! config field and the terminal methods hand the result to the client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::Method;
use serde_json::Value;

use fetchkit_client::config::{
    CacheBusterFn, CacheKeyFn, DedupeKeyFn, PollingOptions, RetryOptions, SelectFn,
    ShouldStopPollingFn, SkipCacheFn,
};
use fetchkit_client::interceptor::{ErrorInterceptor, RequestInterceptor, ResponseInterceptor};
use fetchkit_client::{ErrorStrategy, FetchClient, FetchResponse, RequestConfig};

/// State marker indicating no body has been set
#[derive(Debug, Clone, Copy)]
pub struct BodyNotSet;

/// State marker indicating a body has been set
#[derive(Debug, Clone, Copy)]
pub struct BodySet;

/// Fluent builder for one orchestrated request.
///
/// Type parameter `S` tracks the body state: body setters live on
/// `BodyNotSet` and move the builder to `BodySet`, so a body cannot be
/// set twice.
#[derive(Clone)]
pub struct FetchBuilder<S = BodyNotSet> {
    pub(crate) client: FetchClient,
    pub(crate) url: String,
    pub(crate) config: RequestConfig,
    pub(crate) state: S,
    pub(crate) debug_enabled: bool,
}

impl FetchBuilder<BodyNotSet> {
    /// Start building a request against `client`. The client's default
    /// config is the starting point; every setter overrides one field.
    #[must_use]
    pub fn new(client: &FetchClient, method: Method, url: &str) -> Self {
        let mut config = client.defaults().clone();
        config.method = method;
        Self {
            client: client.clone(),
            url: url.to_string(),
            config,
            state: BodyNotSet,
            debug_enabled: false,
        }
    }
}

impl<S> FetchBuilder<S> {
    /// Enable debug logging of the assembled request before dispatch.
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.debug_enabled = true;
        self
    }

    /// Append one query parameter; serialized onto the URL at send time.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.query.push((key.into(), value.into()));
        self
    }

    /// Per-attempt timeout. Applies to each transport attempt separately,
    /// not to the whole retry sequence.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Cache successful responses for `ttl`. Zero keeps caching disabled.
    #[must_use]
    pub fn cache_time(mut self, ttl: Duration) -> Self {
        self.config.cache.cache_time = ttl;
        self
    }

    /// Derive the cache key with a custom function instead of the default
    /// method/URL/headers/body derivation.
    #[must_use]
    pub fn cache_key(mut self, f: impl Fn(&str, &RequestConfig) -> String + Send + Sync + 'static) -> Self {
        self.config.cache.cache_key = Some(Arc::new(f) as CacheKeyFn);
        self
    }

    /// Skip the cache read (but still write) when `f` returns true.
    #[must_use]
    pub fn cache_buster(
        mut self,
        f: impl Fn(&str, &RequestConfig) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.config.cache.cache_buster = Some(Arc::new(f) as CacheBusterFn);
        self
    }

    /// Skip the cache write when `f` returns true for the response.
    #[must_use]
    pub fn skip_cache(
        mut self,
        f: impl Fn(&FetchResponse, &RequestConfig) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.config.cache.skip_cache = Some(Arc::new(f) as SkipCacheFn);
        self
    }

    /// Share the in-flight outcome with identical requests issued within
    /// `window`. Zero disables deduplication.
    #[must_use]
    pub fn dedupe_time(mut self, window: Duration) -> Self {
        self.config.dedupe_time = window;
        self
    }

    /// Custom dedup identity; absent, the cache key doubles as identity.
    #[must_use]
    pub fn dedupe_key(
        mut self,
        f: impl Fn(&str, &RequestConfig) -> String + Send + Sync + 'static,
    ) -> Self {
        self.config.dedupe_key = Some(Arc::new(f) as DedupeKeyFn);
        self
    }

    /// Full retry policy.
    #[must_use]
    pub fn retry(mut self, options: RetryOptions) -> Self {
        self.config.retry = options;
        self
    }

    /// Shorthand: up to `retries` additional attempts with the default
    /// backoff curve.
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retry.retries = retries;
        self
    }

    /// Full polling policy.
    #[must_use]
    pub fn polling(mut self, options: PollingOptions) -> Self {
        self.config.polling = options;
        self
    }

    /// Shorthand: re-issue the request every `interval` after each
    /// success until stopped.
    #[must_use]
    pub fn poll_every(mut self, interval: Duration) -> Self {
        self.config.polling.interval = interval;
        self
    }

    /// Stop polling when `f` returns true for a response.
    #[must_use]
    pub fn stop_polling_when(
        mut self,
        f: impl Fn(&FetchResponse, u32) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.config.polling.should_stop = Some(Arc::new(f) as ShouldStopPollingFn);
        self
    }

    /// Let a newer request with the same identity abort this one.
    #[must_use]
    pub fn cancellable(mut self, cancellable: bool) -> Self {
        self.config.cancellable = cancellable;
        self
    }

    /// Reject superseded requests instead of resolving them with the
    /// default response.
    #[must_use]
    pub fn reject_cancelled(mut self, reject: bool) -> Self {
        self.config.reject_cancelled = reject;
        self
    }

    /// Disposition for errors that survive the retry policy.
    #[must_use]
    pub fn strategy(mut self, strategy: ErrorStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Unwrap singular `data` envelopes in parsed JSON bodies.
    #[must_use]
    pub fn flatten(mut self) -> Self {
        self.config.flatten_response = true;
        self
    }

    /// Fallback payload for empty bodies and resolved error paths.
    #[must_use]
    pub fn default_response(mut self, value: Value) -> Self {
        self.config.default_response = Some(value);
        self
    }

    /// Map the final JSON data before it is handed back.
    #[must_use]
    pub fn select(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.config.select = Some(Arc::new(f) as SelectFn);
        self
    }

    /// Append a request-phase interceptor; chains run in push order.
    #[must_use]
    pub fn on_request(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.config.on_request.push(interceptor);
        self
    }

    /// Append a response-phase interceptor.
    #[must_use]
    pub fn on_response(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.config.on_response.push(interceptor);
        self
    }

    /// Append an error observer; runs for swallowed errors too.
    #[must_use]
    pub fn on_error(mut self, interceptor: Arc<dyn ErrorInterceptor>) -> Self {
        self.config.on_error.push(interceptor);
        self
    }
}

impl<S: fmt::Debug> fmt::Debug for FetchBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchBuilder")
            .field("url", &self.url)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}
