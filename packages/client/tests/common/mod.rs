//! Shared scripted transport for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde_json::Value;

use fetchkit_client::error::Result;
use fetchkit_client::{FetchClient, RawResponse, Transport, TransportRequest};

/// One scripted transport outcome.
#[derive(Clone)]
pub enum Reply {
    /// Respond with this status and JSON body.
    Json(u16, Value),
    /// Respond with status, JSON body, and extra headers.
    JsonWithHeaders(u16, Value, Vec<(&'static str, &'static str)>),
    /// Fail before producing any response.
    NetworkError,
    /// Never settle; the caller must abort or time out.
    Hang,
}

/// One observed transport call.
pub struct Call {
    pub method: Method,
    pub url: String,
    /// Offset from transport creation on the tokio clock.
    pub at: Duration,
}

/// Transport that replays a script. Replies are consumed front-first and
/// the last one repeats for any further calls.
pub struct MockTransport {
    script: Mutex<Vec<Reply>>,
    calls: Mutex<Vec<Call>>,
    started: tokio::time::Instant,
    latency: Duration,
}

impl MockTransport {
    pub fn new(script: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
            started: tokio::time::Instant::now(),
            latency: Duration::ZERO,
        })
    }

    /// Like `new`, but every reply is delayed by `latency` so tests can
    /// observe requests while they are in flight.
    pub fn with_latency(script: Vec<Reply>, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
            started: tokio::time::Instant::now(),
            latency,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_offsets(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().iter().map(|c| c.at).collect()
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| (c.method.clone(), c.url.clone()))
            .collect()
    }

    fn next_reply(&self) -> Reply {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.remove(0)
        } else {
            script
                .first()
                .cloned()
                .unwrap_or(Reply::Json(200, Value::Null))
        }
    }
}

impl Transport for MockTransport {
    fn fetch(&self, request: TransportRequest) -> BoxFuture<'static, Result<RawResponse>> {
        self.calls.lock().unwrap().push(Call {
            method: request.method.clone(),
            url: request.url.to_string(),
            at: self.started.elapsed(),
        });

        let reply = self.next_reply();
        let latency = self.latency;
        let url = request.url.to_string();

        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            match reply {
                Reply::Json(status, body) => Ok(raw_json(status, &body, &[], url)),
                Reply::JsonWithHeaders(status, body, headers) => {
                    Ok(raw_json(status, &body, &headers, url))
                }
                Reply::NetworkError => Err(fetchkit_client::error::network("connection refused")),
                Reply::Hang => futures::future::pending().await,
            }
        }
        .boxed()
    }
}

fn raw_json(
    status: u16,
    body: &Value,
    extra_headers: &[(&str, &str)],
    url: String,
) -> RawResponse {
    let status = StatusCode::from_u16(status).unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    for (name, value) in extra_headers {
        headers.insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }

    RawResponse {
        status,
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        headers,
        body: Bytes::from(serde_json::to_vec(body).unwrap()),
        url,
    }
}

pub fn client_with(transport: Arc<MockTransport>) -> FetchClient {
    FetchClient::with_transport(transport)
}
