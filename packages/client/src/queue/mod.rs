//! Dedup/cancellation queue
//!
//! Maps a request identity key to the in-flight attempt: its abort
//! controller, registration time, and a shareable future of the outcome.
//! Deduplication hands the same shared future to every caller inside the
//! window; supersession aborts and evicts the previous holder of a key.

pub mod abort;

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use futures::future::{BoxFuture, Shared};

pub use abort::{AbortController, AbortSignal};

use crate::error::{AbortReason, Error};
use crate::response::FetchResponse;

/// Pre-strategy outcome shared between deduplicated callers. The error
/// clone loses its boxed source but keeps kind, status and URL.
pub type SharedOutcome = Shared<BoxFuture<'static, Result<FetchResponse, Error>>>;

/// One in-flight request registration.
pub struct QueueItem {
    /// Registration identity; guards settle-cleanup against races with a
    /// superseding registration under the same key
    pub id: u64,
    pub controller: AbortController,
    pub timestamp: Instant,
    pub shared: SharedOutcome,
    pub cancellable: bool,
}

/// Process-wide (per client) in-flight request registry.
pub struct RequestQueue {
    items: RwLock<HashMap<String, QueueItem>>,
    next_id: AtomicU64,
}

impl RequestQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Return the in-flight shared outcome for `key` if it was registered
    /// within the dedup window.
    #[must_use]
    pub fn deduped(&self, key: &str, window: Duration) -> Option<SharedOutcome> {
        let items = self
            .items
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        items.get(key).and_then(|item| {
            if item.timestamp.elapsed() <= window {
                Some(item.shared.clone())
            } else {
                None
            }
        })
    }

    /// Register a new in-flight request under `key`, superseding any prior
    /// cancellable holder. Returns the registration id for settle-cleanup.
    pub fn register(
        &self,
        key: &str,
        controller: AbortController,
        shared: SharedOutcome,
        cancellable: bool,
    ) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let item = QueueItem {
            id,
            controller,
            timestamp: Instant::now(),
            shared,
            cancellable,
        };

        let mut items = self
            .items
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(old) = items.insert(key.to_string(), item) {
            if old.cancellable {
                old.controller.abort(AbortReason::Superseded);
                tracing::debug!(
                    target: "fetchkit::queue",
                    key,
                    superseded_id = old.id,
                    "superseded in-flight request"
                );
            }
        }
        id
    }

    /// Remove the registration once its request settles. A registration
    /// that was already superseded leaves the newer item untouched.
    pub fn settle(&self, key: &str, id: u64) {
        let mut items = self
            .items
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if items.get(key).is_some_and(|item| item.id == id) {
            items.remove(key);
        }
    }

    /// Abort whatever is currently in flight for `key`.
    pub fn abort(&self, key: &str, reason: AbortReason) -> bool {
        let items = self
            .items
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match items.get(key) {
            Some(item) => {
                item.controller.abort(reason);
                true
            }
            None => false,
        }
    }

    /// Abort and drop every registration (client teardown).
    pub fn clear(&self) {
        let mut items = self
            .items
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for item in items.values() {
            item.controller.abort(AbortReason::Superseded);
        }
        items.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}
