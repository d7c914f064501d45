//! Cooperative abort primitive
//!
//! A cloneable controller/signal pair in the shape of the browser
//! `AbortController`: the orchestrator races the transport future against
//! the signal, so an abort takes effect at the next suspension point.

use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

use crate::error::AbortReason;

#[derive(Debug, Default)]
struct AbortInner {
    aborted: AtomicBool,
    reason: OnceLock<AbortReason>,
    notify: Notify,
}

/// Owning half; aborting is idempotent and the first reason wins.
#[derive(Debug, Clone, Default)]
pub struct AbortController {
    inner: Arc<AbortInner>,
}

impl AbortController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort with a reason. Later calls keep the original reason.
    pub fn abort(&self, reason: AbortReason) {
        let _ = self.inner.reason.set(reason);
        if !self.inner.aborted.swap(true, Ordering::AcqRel) {
            self.inner.notify.notify_waiters();
        }
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::Acquire)
    }

    /// The waiting half handed to the attempt loop.
    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Waiting half of the controller.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    inner: Arc<AbortInner>,
}

impl AbortSignal {
    /// Resolve once the controller aborts, with its reason. Registers the
    /// waiter before checking the flag so a concurrent abort cannot be
    /// missed.
    pub async fn aborted(&self) -> AbortReason {
        loop {
            let notified = self.inner.notify.notified();
            if self.inner.aborted.load(Ordering::Acquire) {
                return *self
                    .inner
                    .reason
                    .get()
                    .unwrap_or(&AbortReason::Superseded);
            }
            notified.await;
        }
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn abort_wakes_waiter_with_reason() {
        let controller = AbortController::new();
        let signal = controller.signal();

        let waiter = tokio::spawn(async move { signal.aborted().await });
        tokio::task::yield_now().await;
        controller.abort(AbortReason::TimedOut);

        assert_eq!(waiter.await.unwrap(), AbortReason::TimedOut);
    }

    #[tokio::test]
    async fn first_reason_wins() {
        let controller = AbortController::new();
        controller.abort(AbortReason::Superseded);
        controller.abort(AbortReason::TimedOut);

        assert_eq!(controller.signal().aborted().await, AbortReason::Superseded);
    }
}
