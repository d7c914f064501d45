//! Commonly used types, one `use` away.
//!
//! ```rust
//! use fetchkit_client::prelude::*;
//! ```

pub use crate::cache::{CacheEvent, CacheStats, CacheStore};
pub use crate::client::{ClientStats, ClientStatsSnapshot, FetchClient};
pub use crate::config::{
    CacheOptions, ErrorStrategy, Payload, PollingOptions, RequestConfig, RetryOptions,
};
pub use crate::error::{AbortReason, Error, Result};
pub use crate::interceptor::{ErrorInterceptor, RequestInterceptor, ResponseInterceptor};
pub use crate::queue::{AbortController, AbortSignal, RequestQueue};
pub use crate::response::{FetchResponse, ResponseData};
pub use crate::transport::{FetchFn, HyperTransport, RawResponse, Transport, TransportRequest};
