//! Configuration surface for the orchestration engine
//!
//! One module per concern, each carrying its own defaults and validation.

pub mod cache;
pub mod polling;
pub mod request;
pub mod retry;
pub mod strategy;

pub use cache::{CacheBusterFn, CacheKeyFn, CacheOptions, SkipCacheFn};
pub use polling::{PollingOptions, ShouldStopPollingFn};
pub use request::{DedupeKeyFn, Payload, RequestConfig, SelectFn};
pub use retry::{RetryOptions, ShouldRetryFn};
pub use strategy::ErrorStrategy;
