//! Per-request configuration
//!
//! `RequestConfig` describes one request attempt: verb, headers, payload,
//! and every orchestration knob (cache, dedupe, retry, cancellation,
//! polling, strategy, interceptors). It is built once per call by merging
//! client defaults with caller overrides and is immutable by convention
//! once the transport call starts; interceptors receive the working copy
//! before that point.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde_json::Value;

use crate::config::{CacheOptions, ErrorStrategy, PollingOptions, RetryOptions};
use crate::interceptor::{ErrorInterceptor, RequestInterceptor, ResponseInterceptor};

/// Derives a custom dedup identity key from the request URL and effective
/// config.
pub type DedupeKeyFn = Arc<dyn Fn(&str, &RequestConfig) -> String + Send + Sync>;

/// Maps the final parsed JSON data before it is handed to the caller.
pub type SelectFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Request body payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// No body
    #[default]
    Empty,
    /// JSON-encoded body (`application/json`)
    Json(Value),
    /// Plain text body
    Text(String),
    /// URL-encoded form body (`application/x-www-form-urlencoded`)
    Form(Vec<(String, String)>),
    /// Raw bytes, sent as-is
    Bytes(Bytes),
}

impl Payload {
    /// Content type implied by this payload, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Payload::Empty | Payload::Bytes(_) => None,
            Payload::Json(_) => Some("application/json"),
            Payload::Text(_) => Some("text/plain"),
            Payload::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }

    /// Serialize the payload to wire bytes.
    ///
    /// # Errors
    ///
    /// Returns a builder error if JSON or form serialization fails.
    pub fn to_bytes(&self) -> crate::error::Result<Bytes> {
        match self {
            Payload::Empty => Ok(Bytes::new()),
            Payload::Json(value) => serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(crate::error::builder),
            Payload::Text(text) => Ok(Bytes::from(text.clone())),
            Payload::Form(pairs) => serde_urlencoded::to_string(pairs)
                .map(Bytes::from)
                .map_err(crate::error::builder),
            Payload::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }
}

/// Declarative description of one orchestrated request.
#[derive(Clone)]
pub struct RequestConfig {
    /// HTTP method
    pub method: Method,
    /// Request headers
    pub headers: HeaderMap,
    /// Query parameters, serialized onto the URL at send time
    pub query: Vec<(String, String)>,
    /// Request body
    pub body: Payload,
    /// Per-attempt timeout; `None` disables the timer
    pub timeout: Option<Duration>,
    /// Cache behavior
    pub cache: CacheOptions,
    /// In-flight dedup window; zero disables deduplication
    pub dedupe_time: Duration,
    /// Custom dedup identity; absent reuses the cache-key derivation
    pub dedupe_key: Option<DedupeKeyFn>,
    /// Retry behavior
    pub retry: RetryOptions,
    /// Polling behavior
    pub polling: PollingOptions,
    /// Whether a newer request with the same identity supersedes this one
    pub cancellable: bool,
    /// Whether a superseded request rejects instead of resolving with the
    /// default response
    pub reject_cancelled: bool,
    /// Disposition for errors that survive the retry policy
    pub strategy: ErrorStrategy,
    /// Unwrap singular `data` envelopes in parsed JSON bodies
    pub flatten_response: bool,
    /// Fallback payload for empty bodies and resolved error paths
    pub default_response: Option<Value>,
    /// Maps the final JSON data before resolution
    pub select: Option<SelectFn>,
    /// Request-phase interceptors, applied in order
    pub on_request: Vec<Arc<dyn RequestInterceptor>>,
    /// Response-phase interceptors, applied in order
    pub on_response: Vec<Arc<dyn ResponseInterceptor>>,
    /// Error observers; never alter disposition
    pub on_error: Vec<Arc<dyn ErrorInterceptor>>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: Payload::Empty,
            timeout: None,
            cache: CacheOptions::default(),
            dedupe_time: Duration::ZERO,
            dedupe_key: None,
            retry: RetryOptions::default(),
            polling: PollingOptions::default(),
            cancellable: false,
            reject_cancelled: false,
            strategy: ErrorStrategy::Reject,
            flatten_response: false,
            default_response: None,
            select: None,
            on_request: Vec::new(),
            on_response: Vec::new(),
            on_error: Vec::new(),
        }
    }
}

impl RequestConfig {
    /// Config for a simple GET with everything else at defaults.
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// Config for the given method with everything else at defaults.
    #[must_use]
    pub fn with_method(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    /// Whether the method is safe/idempotent for cache-key purposes.
    #[must_use]
    pub fn is_get_like(&self) -> bool {
        matches!(self.method, Method::GET | Method::HEAD | Method::OPTIONS)
    }

    /// Validate the assembled configuration before any network work.
    ///
    /// # Errors
    ///
    /// Returns a builder error when retry options are inconsistent.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.retry.validate().map_err(crate::error::builder)
    }
}

impl fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestConfig")
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("timeout", &self.timeout)
            .field("cache", &self.cache)
            .field("dedupe_time", &self.dedupe_time)
            .field("retry", &self.retry)
            .field("polling", &self.polling)
            .field("cancellable", &self.cancellable)
            .field("reject_cancelled", &self.reject_cancelled)
            .field("strategy", &self.strategy)
            .field("flatten_response", &self.flatten_response)
            .field("default_response", &self.default_response)
            .field("on_request", &self.on_request.len())
            .field("on_response", &self.on_response.len())
            .field("on_error", &self.on_error.len())
            .finish()
    }
}
