//! Fluent request-orchestration API
//!
//! Caching, deduplication, retry, cancellation and polling behind one
//! builder chain:
//!
//! ```no_run
//! use std::time::Duration;
//! use fetchkit::Fetch;
//!
//! # async fn run() -> fetchkit::Result<()> {
//! let response = Fetch::get("https://api.example.com/books")
//!     .cache_time(Duration::from_secs(60))
//!     .retries(3)
//!     .send()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! The engine itself lives in the `fetchkit_client` crate; this crate is
//! the builder surface plus a process-default client.

#![deny(unsafe_code)]

use http::Method;
use once_cell::sync::OnceCell;

pub mod builder;

pub use builder::{BodyNotSet, BodySet, FetchBuilder};

// The engine's vocabulary, re-exported so most callers only depend on
// this crate.
pub use fetchkit_client::{
    AbortController, AbortSignal, CacheOptions, CacheStore, ClientStatsSnapshot, Error,
    ErrorStrategy, FetchClient, FetchFn, FetchResponse, Payload, PollingOptions, RawResponse,
    RequestConfig, ResponseData, Result, RetryOptions, Transport, TransportRequest,
};

static GLOBAL_CLIENT: OnceCell<FetchClient> = OnceCell::new();

/// The process-default client backing the static [`Fetch`] entry points.
/// Created on first use with the default hyper transport.
pub fn default_client() -> &'static FetchClient {
    GLOBAL_CLIENT.get_or_init(FetchClient::new)
}

/// Static entry points against the process-default client.
pub struct Fetch;

impl Fetch {
    /// Start a GET request.
    #[must_use]
    pub fn get(url: &str) -> FetchBuilder {
        FetchBuilder::new(default_client(), Method::GET, url)
    }

    /// Start a POST request.
    #[must_use]
    pub fn post(url: &str) -> FetchBuilder {
        FetchBuilder::new(default_client(), Method::POST, url)
    }

    /// Start a PUT request.
    #[must_use]
    pub fn put(url: &str) -> FetchBuilder {
        FetchBuilder::new(default_client(), Method::PUT, url)
    }

    /// Start a PATCH request.
    #[must_use]
    pub fn patch(url: &str) -> FetchBuilder {
        FetchBuilder::new(default_client(), Method::PATCH, url)
    }

    /// Start a DELETE request.
    #[must_use]
    pub fn delete(url: &str) -> FetchBuilder {
        FetchBuilder::new(default_client(), Method::DELETE, url)
    }

    /// Start a HEAD request.
    #[must_use]
    pub fn head(url: &str) -> FetchBuilder {
        FetchBuilder::new(default_client(), Method::HEAD, url)
    }
}

/// Builder entry points on a client instance, for callers that manage
/// their own [`FetchClient`] instead of the process default.
pub trait ClientExt {
    /// Start a GET request against this client.
    fn get(&self, url: &str) -> FetchBuilder;
    /// Start a POST request against this client.
    fn post(&self, url: &str) -> FetchBuilder;
    /// Start a PUT request against this client.
    fn put(&self, url: &str) -> FetchBuilder;
    /// Start a PATCH request against this client.
    fn patch(&self, url: &str) -> FetchBuilder;
    /// Start a DELETE request against this client.
    fn delete(&self, url: &str) -> FetchBuilder;
    /// Start a HEAD request against this client.
    fn head(&self, url: &str) -> FetchBuilder;
    /// Start a request with an arbitrary method against this client.
    fn build_request(&self, method: Method, url: &str) -> FetchBuilder;
}

impl ClientExt for FetchClient {
    fn get(&self, url: &str) -> FetchBuilder {
        FetchBuilder::new(self, Method::GET, url)
    }

    fn post(&self, url: &str) -> FetchBuilder {
        FetchBuilder::new(self, Method::POST, url)
    }

    fn put(&self, url: &str) -> FetchBuilder {
        FetchBuilder::new(self, Method::PUT, url)
    }

    fn patch(&self, url: &str) -> FetchBuilder {
        FetchBuilder::new(self, Method::PATCH, url)
    }

    fn delete(&self, url: &str) -> FetchBuilder {
        FetchBuilder::new(self, Method::DELETE, url)
    }

    fn head(&self, url: &str) -> FetchBuilder {
        FetchBuilder::new(self, Method::HEAD, url)
    }

    fn build_request(&self, method: Method, url: &str) -> FetchBuilder {
        FetchBuilder::new(self, method, url)
    }
}
