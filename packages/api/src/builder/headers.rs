//! Header configuration methods

use http::header::{ACCEPT, CONTENT_TYPE, HeaderName, HeaderValue};

use super::core::FetchBuilder;

impl<S> FetchBuilder<S> {
    /// Set a header on the request. Invalid names or values are logged
    /// and skipped rather than failing the chain.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.config.headers.insert(name, value);
            }
            _ => {
                tracing::warn!(
                    target: "fetchkit::builder",
                    name,
                    "skipping invalid header"
                );
            }
        }
        self
    }

    /// Set several headers at once.
    #[must_use]
    pub fn headers<'a, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in pairs {
            self = self.header(name, value);
        }
        self
    }

    /// Set the `Content-Type` header explicitly, overriding the one the
    /// payload implies.
    #[must_use]
    pub fn content_type(mut self, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.config.headers.insert(CONTENT_TYPE, value);
        }
        self
    }

    /// Set the `Accept` header.
    #[must_use]
    pub fn accept(mut self, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.config.headers.insert(ACCEPT, value);
        }
        self
    }

    /// Set an `Authorization: Bearer` header.
    #[must_use]
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("authorization", &format!("Bearer {token}"))
    }
}

#[cfg(test)]
mod tests {
    use fetchkit_client::FetchClient;
    use http::Method;

    use super::super::core::FetchBuilder;

    #[test]
    fn header_roundtrip() {
        let client = FetchClient::new();
        let builder = FetchBuilder::new(&client, Method::GET, "https://api.example.com")
            .header("x-request-id", "abc")
            .accept("application/json");

        assert_eq!(builder.config.headers["x-request-id"], "abc");
        assert_eq!(builder.config.headers["accept"], "application/json");
    }

    #[test]
    fn invalid_header_is_skipped() {
        let client = FetchClient::new();
        let builder =
            FetchBuilder::new(&client, Method::GET, "https://api.example.com").header("bad\nname", "v");

        assert!(builder.config.headers.is_empty());
    }
}
