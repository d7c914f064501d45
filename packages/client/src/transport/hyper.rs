//! Default transport backed by the hyper legacy client
//!
//! Plain HTTP/1 only. Anything beyond that (TLS, pooling knobs, proxies)
//! belongs to a caller-supplied [`Transport`].

use bytes::Bytes;
use futures::future::BoxFuture;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use super::{RawResponse, Transport, TransportRequest};
use crate::error::Result;

/// Thin hyper-backed transport.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    fn fetch(&self, request: TransportRequest) -> BoxFuture<'static, Result<RawResponse>> {
        let client = self.client.clone();
        Box::pin(async move {
            let url = request.url.to_string();

            let mut req = http::Request::builder()
                .method(request.method)
                .uri(url.as_str())
                .body(Full::new(request.body))
                .map_err(crate::error::builder)?;
            *req.headers_mut() = request.headers;

            let response = client.request(req).await.map_err(crate::error::network)?;
            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(crate::error::network)?
                .to_bytes();

            Ok(RawResponse {
                status: parts.status,
                status_text: parts
                    .status
                    .canonical_reason()
                    .unwrap_or_default()
                    .to_string(),
                headers: parts.headers,
                body,
                url,
            })
        })
    }
}
