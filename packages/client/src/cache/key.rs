//! Cache key derivation
//!
//! GET-like requests key on `METHOD|sanitized-URL`. Anything with a body
//! joins method, URL, a sorted header serialization and a body
//! serialization with `|`; segments are stripped to `[A-Za-z0-9_-]` so
//! header or body content cannot inject a delimiter into the key space,
//! and long segments collapse to a rolling hash.

use http::HeaderMap;

use crate::config::{Payload, RequestConfig};

/// Segments longer than this are replaced by their hash.
const HASH_THRESHOLD: usize = 64;

/// Derive the cache/identity key for a request. A configured `cache_key`
/// function takes precedence over the built-in format.
#[must_use]
pub fn generate_cache_key(url: &str, config: &RequestConfig) -> String {
    if let Some(custom) = &config.cache.cache_key {
        return custom(url, config);
    }

    let method = config.method.as_str();

    if config.is_get_like() {
        return format!("{}|{}", method, sanitize(url));
    }

    format!(
        "{}|{}|{}|{}",
        method,
        sanitize(url),
        segment(&serialize_headers(&config.headers)),
        segment(&serialize_body(&config.body)),
    )
}

/// Strip everything outside `[A-Za-z0-9_-]`.
fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .collect()
}

/// Sanitize a segment, hashing it when it exceeds the threshold.
fn segment(input: &str) -> String {
    let clean = sanitize(input);
    if clean.len() > HASH_THRESHOLD {
        rolling_hash(&clean).to_string()
    } else {
        clean
    }
}

/// 31-multiplier rolling hash over the sanitized segment.
fn rolling_hash(input: &str) -> u64 {
    input
        .bytes()
        .fold(0u64, |hash, byte| hash.wrapping_mul(31).wrapping_add(u64::from(byte)))
}

/// Deterministic sorted `name:value` serialization of the headers.
fn serialize_headers(headers: &HeaderMap) -> String {
    let mut pairs: Vec<String> = headers
        .iter()
        .map(|(name, value)| {
            format!("{}:{}", name.as_str(), value.to_str().unwrap_or_default())
        })
        .collect();
    pairs.sort_unstable();
    pairs.join(",")
}

/// Deterministic body serialization; JSON objects serialize with sorted
/// keys (serde_json's default map ordering).
fn serialize_body(body: &Payload) -> String {
    match body {
        Payload::Empty => String::new(),
        Payload::Json(value) => serde_json::to_string(value).unwrap_or_default(),
        Payload::Text(text) => text.clone(),
        Payload::Form(pairs) => {
            let mut sorted: Vec<String> =
                pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
            sorted.sort_unstable();
            sorted.join("&")
        }
        Payload::Bytes(bytes) => rolling_hash_bytes(bytes).to_string(),
    }
}

fn rolling_hash_bytes(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |hash, byte| hash.wrapping_mul(31).wrapping_add(u64::from(*byte)))
}
