//! Byte-transport seam
//!
//! The engine never speaks a wire protocol itself; it hands a fully built
//! request to an injected [`Transport`] and gets back a materialized
//! [`RawResponse`]. The default implementation is a thin hyper call with
//! no pooling or TLS surface of its own.

pub mod hyper;

use bytes::Bytes;
use futures::future::BoxFuture;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

pub use hyper::HyperTransport;

use crate::error::Result;

/// One fully assembled request attempt, built from the immutable
/// effective config.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// URL with the query string already serialized onto it
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Materialized transport response: status surface, headers, body bytes.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub status_text: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub url: String,
}

/// Injectable fetch-like primitive.
pub trait Transport: Send + Sync {
    /// Perform one transport call. Cancellation and timeout are driven by
    /// the orchestrator racing this future; implementations only need to
    /// be drop-safe.
    fn fetch(&self, request: TransportRequest) -> BoxFuture<'static, Result<RawResponse>>;
}

/// Adapter turning any fetch-shaped closure into a [`Transport`].
pub struct FetchFn<F>(pub F);

impl<F> Transport for FetchFn<F>
where
    F: Fn(TransportRequest) -> BoxFuture<'static, Result<RawResponse>> + Send + Sync,
{
    fn fetch(&self, request: TransportRequest) -> BoxFuture<'static, Result<RawResponse>> {
        (self.0)(request)
    }
}
