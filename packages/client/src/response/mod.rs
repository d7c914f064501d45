//! Normalized response surface
//!
//! Every orchestrated request resolves to a [`FetchResponse`]: parsed data,
//! the error slot, status metadata, headers, and the effective config that
//! produced it. Exactly one of `data`/`error` carries the primary payload,
//! except under the soft-fail strategy where both are populated.

pub mod data;
pub mod normalizer;

use std::fmt;

use http::{HeaderMap, StatusCode};
use serde_json::Value;

pub use data::ResponseData;
pub use normalizer::{flatten_envelope, parse_body};

use crate::config::RequestConfig;
use crate::error::Error;
use crate::transport::RawResponse;

/// Normalized result of one orchestrated request.
#[derive(Clone)]
pub struct FetchResponse {
    /// Parsed (and optionally flattened/selected) body
    pub data: ResponseData,
    /// Populated on non-2xx or transport failure; may coexist with a
    /// usable `data` under a non-rejecting strategy
    pub error: Option<Error>,
    /// HTTP status; `None` when the transport never produced a response
    pub status: Option<StatusCode>,
    /// Reason phrase, empty when unknown
    pub status_text: String,
    /// Response headers
    pub headers: HeaderMap,
    /// Final request URL
    pub url: String,
    /// The effective config this response was produced under
    pub config: RequestConfig,
    /// True iff a 2xx response with no error attached
    pub ok: bool,
}

impl FetchResponse {
    /// Build a normalized response from a raw transport response.
    ///
    /// Applies the full normalization pipeline: content-type parse,
    /// envelope flattening, `default_response` substitution, `select`.
    #[must_use]
    pub fn from_raw(raw: RawResponse, config: RequestConfig) -> Self {
        let content_type = raw
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let mut data = parse_body(content_type.as_deref(), &raw.body);

        if config.flatten_response {
            if let ResponseData::Json(value) = data {
                data = ResponseData::Json(flatten_envelope(value));
            }
        }

        if data.is_nullish() {
            if let Some(fallback) = &config.default_response {
                data = ResponseData::Json(fallback.clone());
            }
        }

        if let Some(select) = &config.select {
            if let ResponseData::Json(value) = data {
                data = ResponseData::Json(select(value));
            }
        }

        let error = if raw.status.is_success() {
            None
        } else {
            Some(crate::error::status(raw.status, raw.status_text.clone()))
        };

        let ok = raw.status.is_success();

        Self {
            data,
            error,
            status: Some(raw.status),
            status_text: raw.status_text,
            headers: raw.headers,
            url: raw.url,
            config,
            ok,
        }
    }

    /// Build the resolved shape for a request that failed without a
    /// response, or whose error is being swallowed by the active strategy.
    /// `data` carries the configured `default_response` when present.
    #[must_use]
    pub fn failure(url: String, config: RequestConfig, error: Error) -> Self {
        let data = config
            .default_response
            .as_ref()
            .map(|v| ResponseData::Json(v.clone()))
            .unwrap_or_default();
        let status = error.status();
        let status_text = status
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();

        Self {
            data,
            error: Some(error),
            status,
            status_text,
            headers: HeaderMap::new(),
            url,
            config,
            ok: false,
        }
    }

    /// Minimal resolved response carrying only data. Used for optimistic
    /// cache mutations that land before any network response exists.
    #[must_use]
    pub fn synthetic(data: ResponseData) -> Self {
        Self {
            data,
            error: None,
            status: None,
            status_text: String::new(),
            headers: HeaderMap::new(),
            url: String::new(),
            config: RequestConfig::default(),
            ok: true,
        }
    }

    /// Single header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The parsed JSON data, if any.
    #[must_use]
    pub fn json(&self) -> Option<&Value> {
        self.data.as_json()
    }

    /// Deserialize the payload into a concrete type.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the payload is not JSON-shaped `T`.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> crate::error::Result<T> {
        self.data.deserialize()
    }
}

impl fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchResponse")
            .field("data", &self.data)
            .field("error", &self.error)
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("url", &self.url)
            .field("ok", &self.ok)
            .finish()
    }
}
