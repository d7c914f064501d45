//! Normalized response payload variants

use bytes::Bytes;
use serde_json::Value;

/// Parsed response body after content-type driven normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseData {
    /// Body was empty or unparseable by every strategy
    #[default]
    Empty,
    /// JSON body, or text that auto-parsed as JSON
    Json(Value),
    /// Plain text body
    Text(String),
    /// Decoded form fields (urlencoded or multipart text parts)
    Form(Vec<(String, String)>),
    /// Raw binary body
    Binary(Bytes),
}

impl ResponseData {
    /// The parsed JSON value, if this payload is JSON.
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The body as text, if this payload is textual.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// True for `Empty` and JSON `null`, the shapes `default_response`
    /// substitutes for.
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        match self {
            ResponseData::Empty => true,
            ResponseData::Json(Value::Null) => true,
            _ => false,
        }
    }

    /// Deserialize the payload into a concrete type.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the payload is not JSON or does not
    /// match `T`.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> crate::error::Result<T> {
        match self {
            ResponseData::Json(value) => {
                serde_json::from_value(value.clone()).map_err(crate::error::parse)
            }
            ResponseData::Text(text) => {
                serde_json::from_str(text).map_err(crate::error::parse)
            }
            other => Err(crate::error::parse(format!(
                "cannot deserialize {other:?} payload as JSON"
            ))),
        }
    }
}
