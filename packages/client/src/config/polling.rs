//! Polling configuration
//!
//! Polling re-runs a completed request on an interval until a stop
//! condition is met. Retry handles per-attempt recovery; an error that
//! survives retries stops polling immediately.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::response::FetchResponse;

/// Callback deciding whether polling should stop. Receives the latest
/// response and the 1-based poll attempt counter.
pub type ShouldStopPollingFn = Arc<dyn Fn(&FetchResponse, u32) -> bool + Send + Sync>;

/// Runtime polling configuration
#[derive(Clone, Default)]
pub struct PollingOptions {
    /// Interval between polls; zero disables polling entirely
    pub interval: Duration,
    /// Extra delay applied before the first re-poll
    pub delay: Duration,
    /// Upper bound on poll attempts; zero means unbounded
    pub max_attempts: u32,
    /// Stop condition; absent means poll until `max_attempts`
    pub should_stop: Option<ShouldStopPollingFn>,
}

impl PollingOptions {
    /// Poll every `interval` until the stop condition or `max_attempts`.
    #[must_use]
    pub fn every(interval: Duration) -> Self {
        Self { interval, ..Self::default() }
    }

    /// Whether polling is enabled at all.
    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.interval.is_zero()
    }
}

impl fmt::Debug for PollingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollingOptions")
            .field("interval", &self.interval)
            .field("delay", &self.delay)
            .field("max_attempts", &self.max_attempts)
            .field("should_stop", &self.should_stop.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
