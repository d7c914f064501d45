//! Retry decision logic
//!
//! A pure function of (outcome, attempt, options): whether to re-attempt
//! and how long to wait. The delay schedule is deterministic exponential
//! backoff clamped to `max_delay`; a 429 carrying `Retry-After` overrides
//! the computed delay.

use std::time::{Duration, SystemTime};

use http::HeaderMap;

use crate::cache::httpdate;
use crate::config::RetryOptions;
use crate::error::Error;
use crate::response::FetchResponse;

/// Outcome of consulting the policy after a failed (or suspect) attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    pub should_retry: bool,
    pub delay: Duration,
}

impl RetryDecision {
    const GIVE_UP: RetryDecision = RetryDecision {
        should_retry: false,
        delay: Duration::ZERO,
    };
}

/// Decide whether attempt `attempt` (0-based count of completed attempts)
/// should be followed by another one.
///
/// Cancellations never retry. Network errors always qualify; responses
/// qualify when their status is in `retry_on` or the async `should_retry`
/// predicate elects them — the predicate sees the parsed response, so it
/// runs even for 2xx ("retry until the payload looks right").
pub async fn evaluate(
    options: &RetryOptions,
    outcome: &Result<FetchResponse, Error>,
    attempt: u32,
) -> RetryDecision {
    if attempt >= options.retries {
        return RetryDecision::GIVE_UP;
    }

    let eligible = match outcome {
        Err(error) if error.is_cancellation() => false,
        Err(_) => true,
        Ok(response) => {
            let status_eligible = response
                .status
                .is_some_and(|s| options.retry_on.contains(&s.as_u16()));
            if status_eligible {
                true
            } else if let Some(predicate) = &options.should_retry {
                predicate(response, attempt).await
            } else {
                false
            }
        }
    };

    if !eligible {
        return RetryDecision::GIVE_UP;
    }

    let delay = match outcome {
        Ok(response) if response.status.map(|s| s.as_u16()) == Some(429) => {
            retry_after(&response.headers, options.max_delay)
                .unwrap_or_else(|| delay_for(options, attempt))
        }
        _ => delay_for(options, attempt),
    };

    tracing::warn!(
        target: "fetchkit::retry",
        attempt = attempt + 1,
        delay_ms = delay.as_millis() as u64,
        "retrying request"
    );

    RetryDecision { should_retry: true, delay }
}

/// `delay * backoff^attempt`, clamped to `max_delay`.
#[must_use]
pub fn delay_for(options: &RetryOptions, attempt: u32) -> Duration {
    let base = options.delay.as_millis() as f64;
    let factor = options.backoff.powi(i32::try_from(attempt).unwrap_or(i32::MAX));
    let computed = (base * factor).min(options.max_delay.as_millis() as f64);
    Duration::from_millis(computed as u64)
}

/// Parse a `Retry-After` header: first as a non-negative integer of
/// seconds (taken verbatim), then as an HTTP-date whose distance from now
/// is clamped to `[0, max_delay]`. Unparseable headers yield `None`.
#[must_use]
pub fn retry_after(headers: &HeaderMap, max_delay: Duration) -> Option<Duration> {
    let value = headers
        .get(http::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let date = httpdate::parse_http_date(value).ok()?;
    let delay = date
        .duration_since(SystemTime::now())
        .unwrap_or(Duration::ZERO);
    Some(delay.min(max_delay))
}
