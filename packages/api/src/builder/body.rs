//! Body configuration methods
//!
//! Body setters consume a `BodyNotSet` builder and return a `BodySet`
//! one, so a request body can only be set once per chain.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use fetchkit_client::Payload;

use super::core::{BodyNotSet, BodySet, FetchBuilder};

impl FetchBuilder<BodyNotSet> {
    fn with_payload(self, body: Payload) -> FetchBuilder<BodySet> {
        let mut config = self.config;
        config.body = body;
        FetchBuilder {
            client: self.client,
            url: self.url,
            config,
            state: BodySet,
            debug_enabled: self.debug_enabled,
        }
    }

    /// JSON body from any serializable value. An unserializable value is
    /// logged and sent as `null`, keeping the chain infallible.
    #[must_use]
    pub fn json<T: Serialize>(self, body: &T) -> FetchBuilder<BodySet> {
        match serde_json::to_value(body) {
            Ok(value) => self.with_payload(Payload::Json(value)),
            Err(e) => {
                tracing::warn!(
                    target: "fetchkit::builder",
                    error = %e,
                    "body serialization failed; sending null"
                );
                self.with_payload(Payload::Json(Value::Null))
            }
        }
    }

    /// JSON body from an already-built value.
    #[must_use]
    pub fn json_value(self, value: Value) -> FetchBuilder<BodySet> {
        self.with_payload(Payload::Json(value))
    }

    /// Plain text body.
    #[must_use]
    pub fn text(self, body: impl Into<String>) -> FetchBuilder<BodySet> {
        self.with_payload(Payload::Text(body.into()))
    }

    /// URL-encoded form body.
    #[must_use]
    pub fn form<K, V, I>(self, pairs: I) -> FetchBuilder<BodySet>
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.with_payload(Payload::Form(pairs))
    }

    /// Raw bytes, sent as-is with no implied content type.
    #[must_use]
    pub fn bytes(self, body: impl Into<Bytes>) -> FetchBuilder<BodySet> {
        self.with_payload(Payload::Bytes(body.into()))
    }
}

#[cfg(test)]
mod tests {
    use fetchkit_client::{FetchClient, Payload};
    use http::Method;
    use serde_json::json;

    use super::super::core::FetchBuilder;

    #[test]
    fn json_body_sets_payload() {
        let client = FetchClient::new();
        let builder = FetchBuilder::new(&client, Method::POST, "https://api.example.com")
            .json_value(json!({"name": "milo"}));

        assert_eq!(
            builder.config.body,
            Payload::Json(json!({"name": "milo"}))
        );
    }

    #[test]
    fn form_body_keeps_pair_order() {
        let client = FetchClient::new();
        let builder = FetchBuilder::new(&client, Method::POST, "https://api.example.com")
            .form([("a", "1"), ("b", "2")]);

        assert_eq!(
            builder.config.body,
            Payload::Form(vec![("a".into(), "1".into()), ("b".into(), "2".into())])
        );
    }
}
