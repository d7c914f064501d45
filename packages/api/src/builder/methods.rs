//! Terminal methods
//!
//! `send()` hands the assembled config to the orchestrator; `send_as`
//! additionally deserializes the resolved JSON data.

use serde::de::DeserializeOwned;

use fetchkit_client::error::Result;
use fetchkit_client::FetchResponse;

use super::core::FetchBuilder;

impl<S: Send> FetchBuilder<S> {
    /// Dispatch the request through the orchestration pipeline.
    ///
    /// # Errors
    ///
    /// Rejects per the configured strategy; under the default `Reject`
    /// strategy that means the terminal error once retries are exhausted.
    pub async fn send(self) -> Result<FetchResponse> {
        if self.debug_enabled {
            tracing::debug!(
                target: "fetchkit::builder",
                method = %self.config.method,
                url = %self.url,
                "dispatching request"
            );
        }
        self.client.request(&self.url, self.config).await
    }

    /// Dispatch the request and deserialize the resolved data into `T`.
    ///
    /// # Errors
    ///
    /// Everything `send` rejects with, plus a parse error when the
    /// resolved data does not deserialize into `T`.
    pub async fn send_as<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await?;
        response.deserialize()
    }
}
