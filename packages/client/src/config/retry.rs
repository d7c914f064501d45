//! Retry configuration
//!
//! Pure configuration consumed once per attempt by the retry policy.
//! The delay schedule is deterministic: `delay * backoff^attempt` clamped
//! to `max_delay`, with `Retry-After` taking precedence on 429.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::response::FetchResponse;

/// Async predicate consulted per attempt; sees the parsed response, so it
/// can elect a retry even for a 2xx whose payload looks wrong.
pub type ShouldRetryFn =
    Arc<dyn Fn(&FetchResponse, u32) -> BoxFuture<'static, bool> + Send + Sync>;

/// Runtime retry configuration
#[derive(Clone)]
pub struct RetryOptions {
    /// Maximum number of retry attempts (total attempts = retries + 1)
    pub retries: u32,
    /// Initial delay before the first retry
    pub delay: Duration,
    /// Backoff multiplier (typically 2.0 for exponential backoff)
    pub backoff: f64,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Status codes eligible for retry
    pub retry_on: Vec<u16>,
    /// Optional async predicate overriding/extending `retry_on`
    pub should_retry: Option<ShouldRetryFn>,
}

impl Default for RetryOptions {
    /// Retries disabled by default; opting in inherits a balanced schedule.
    fn default() -> Self {
        Self {
            retries: 0,
            delay: Duration::from_millis(1000),
            backoff: 2.0,
            max_delay: Duration::from_secs(30),
            retry_on: vec![408, 409, 425, 429, 500, 502, 503, 504],
            should_retry: None,
        }
    }
}

impl RetryOptions {
    /// Enable retries with the default schedule.
    #[must_use]
    pub fn attempts(retries: u32) -> Self {
        Self { retries, ..Self::default() }
    }

    /// Validate retry configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `backoff` is less than 1.0
    /// - `delay` exceeds `max_delay`
    pub fn validate(&self) -> Result<(), String> {
        if self.backoff < 1.0 {
            return Err("backoff must be >= 1.0".to_string());
        }

        if self.delay > self.max_delay {
            return Err("delay cannot exceed max_delay".to_string());
        }

        Ok(())
    }
}

impl fmt::Debug for RetryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("retries", &self.retries)
            .field("delay", &self.delay)
            .field("backoff", &self.backoff)
            .field("max_delay", &self.max_delay)
            .field("retry_on", &self.retry_on)
            .field("should_retry", &self.should_retry.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
