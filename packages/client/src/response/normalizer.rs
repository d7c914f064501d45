//! Content-type driven body parsing
//!
//! Parse failures degrade rather than propagate: a malformed body must not
//! mask a successful status, so every strategy falls back toward text and
//! finally `Empty`.

use bytes::Bytes;
use serde_json::Value;

use super::data::ResponseData;

/// Parse a raw body according to the `Content-Type` header.
#[must_use]
pub fn parse_body(content_type: Option<&str>, body: &Bytes) -> ResponseData {
    if body.is_empty() {
        return ResponseData::Empty;
    }

    let media_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .unwrap_or_default();

    if media_type.ends_with("/json") || media_type.ends_with("+json") {
        return parse_json_or_text(body);
    }

    if media_type == "application/x-www-form-urlencoded" {
        match serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) {
            Ok(pairs) => return ResponseData::Form(pairs),
            Err(err) => {
                tracing::debug!(
                    target: "fetchkit::response",
                    error = %err,
                    "urlencoded body failed to decode, degrading to text"
                );
                return text_or_binary(body);
            }
        }
    }

    if media_type == "multipart/form-data" {
        return parse_multipart(content_type.unwrap_or_default(), body);
    }

    if media_type == "application/octet-stream" {
        return ResponseData::Binary(body.clone());
    }

    if media_type.starts_with("text/") {
        return match std::str::from_utf8(body) {
            Ok(text) => auto_parse_text(text),
            Err(_) => ResponseData::Binary(body.clone()),
        };
    }

    // Unknown or missing content type: JSON first, then text, then Empty
    parse_json_or_text(body)
}

/// JSON parse with text recovery; `Empty` only when the body is not UTF-8
/// either.
fn parse_json_or_text(body: &Bytes) -> ResponseData {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        return ResponseData::Json(value);
    }
    match std::str::from_utf8(body) {
        Ok(text) => ResponseData::Text(text.to_string()),
        Err(_) => ResponseData::Empty,
    }
}

fn text_or_binary(body: &Bytes) -> ResponseData {
    match std::str::from_utf8(body) {
        Ok(text) => ResponseData::Text(text.to_string()),
        Err(_) => ResponseData::Binary(body.clone()),
    }
}

/// Best-effort JSON auto-parse for `text/*` bodies that look like an
/// object or array literal.
fn auto_parse_text(text: &str) -> ResponseData {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return ResponseData::Json(value);
        }
    }
    ResponseData::Text(text.to_string())
}

/// Minimal multipart/form-data decode: text parts become form pairs, file
/// and binary parts keep the raw body.
fn parse_multipart(content_type: &str, body: &Bytes) -> ResponseData {
    let Some(boundary) = content_type
        .split(';')
        .map(str::trim)
        .find_map(|p| p.strip_prefix("boundary="))
        .map(|b| b.trim_matches('"'))
    else {
        return ResponseData::Binary(body.clone());
    };

    let Ok(text) = std::str::from_utf8(body) else {
        return ResponseData::Binary(body.clone());
    };

    let delimiter = format!("--{boundary}");
    let mut pairs = Vec::new();

    for part in text.split(delimiter.as_str()) {
        let part = part.trim_matches(|c| c == '\r' || c == '\n');
        if part.is_empty() || part == "--" {
            continue;
        }

        let Some((head, value)) = part.split_once("\r\n\r\n").or_else(|| part.split_once("\n\n"))
        else {
            continue;
        };

        // File parts are not representable as text pairs; keep scanning
        if head.contains("filename=") {
            continue;
        }

        let Some(name) = head
            .split(';')
            .map(str::trim)
            .find_map(|p| p.strip_prefix("name="))
            .map(|n| n.trim_matches('"').trim_end_matches("\r\n"))
        else {
            continue;
        };

        pairs.push((name.to_string(), value.trim_end_matches(['\r', '\n']).to_string()));
    }

    if pairs.is_empty() {
        ResponseData::Binary(body.clone())
    } else {
        ResponseData::Form(pairs)
    }
}

/// Unwrap singular `data` envelopes: `{data:{data:{x:1}}}` becomes `{x:1}`.
/// An object with sibling keys is never unwrapped, so no payload is lost.
#[must_use]
pub fn flatten_envelope(mut value: Value) -> Value {
    loop {
        let is_envelope = value
            .as_object()
            .is_some_and(|map| map.len() == 1 && map.contains_key("data"));
        if !is_envelope {
            return value;
        }
        if let Value::Object(map) = &mut value {
            let inner = map.remove("data").unwrap_or(Value::Null);
            value = inner;
        }
    }
}
