//! Request orchestration engine
//!
//! Everything between "caller wants this resource" and "transport sent
//! these bytes": response caching with TTL, in-flight deduplication,
//! retry with exponential backoff, cooperative cancellation and
//! supersession, polling, and an interceptor pipeline. The HTTP transport
//! itself sits behind the [`transport::Transport`] seam.
//!
//! The fluent request surface lives in the companion `fetchkit` crate;
//! this crate is the engine it drives.

#![deny(unsafe_code)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod prelude;
pub mod queue;
pub mod response;
pub mod retry;
pub mod transport;

pub use cache::{CacheEvent, CacheStats, CacheStore};
pub use client::{ClientStats, ClientStatsSnapshot, FetchClient};
pub use config::{
    CacheOptions, ErrorStrategy, Payload, PollingOptions, RequestConfig, RetryOptions,
};
pub use error::{AbortReason, Error, Result};
pub use queue::{AbortController, AbortSignal, RequestQueue};
pub use response::{FetchResponse, ResponseData};
pub use transport::{FetchFn, HyperTransport, RawResponse, Transport, TransportRequest};
