//! TTL response cache
//!
//! Lock-free storage over a crossbeam `SkipMap` with atomic counters.
//! Freshness is judged per-request (the caller passes its own
//! `cache_time`), and expired entries are evicted on detection. Writes and
//! deletions emit key-scoped change notifications for external
//! subscribers; this is deliberately narrow, not a pub/sub system.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use crossbeam_skiplist::SkipMap;
use tokio::sync::broadcast;
use tokio::time::Instant;

use super::entry::CacheEntry;
use super::stats::CacheStats;
use crate::response::{FetchResponse, ResponseData};

/// Key-scoped cache change notification.
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// The entry for this key was written or refreshed
    Updated { key: String },
    /// The entry for this key was removed
    Removed { key: String },
}

/// In-memory response cache keyed by the derived cache-key string.
pub struct CacheStore {
    entries: SkipMap<String, CacheEntry>,
    stats: CacheStats,
    subscribers: RwLock<HashMap<String, broadcast::Sender<CacheEvent>>>,
}

impl CacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SkipMap::new(),
            stats: CacheStats::new(),
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a fresh entry. A stale entry is evicted on detection and
    /// reported as a miss.
    pub fn get(&self, key: &str, cache_time: Duration) -> Option<FetchResponse> {
        let Some(entry_ref) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let entry = entry_ref.value().clone();
        if !entry.is_fresh(cache_time) {
            entry_ref.remove();
            self.stats.record_miss();
            self.stats.record_eviction();
            tracing::debug!(
                target: "fetchkit::cache",
                key,
                age_ms = entry.age().as_millis() as u64,
                "evicted stale cache entry"
            );
            return None;
        }

        self.stats.record_hit();
        Some(entry.response)
    }

    /// Raw entry lookup without TTL handling (revalidation, tests).
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    /// Write or refresh the entry for `key` and notify subscribers.
    pub fn set(&self, key: &str, response: FetchResponse) {
        self.entries.insert(key.to_string(), CacheEntry::new(response));
        self.stats.record_write();
        self.emit(key, CacheEvent::Updated { key: key.to_string() });
    }

    /// Flag or clear the in-flight refresh marker on an existing entry.
    pub fn mark_loading(&self, key: &str, loading: bool) {
        if let Some(entry_ref) = self.entries.get(key) {
            let mut entry = entry_ref.value().clone();
            entry.is_loading = loading;
            self.entries.insert(key.to_string(), entry);
        }
    }

    /// Overwrite the cached data for `key` immediately. Creates a synthetic
    /// entry when none exists so optimistic updates work before the first
    /// fetch. Subscribers are notified.
    pub fn mutate(&self, key: &str, data: ResponseData) {
        let mut entry = self
            .entries
            .get(key)
            .map(|e| e.value().clone())
            .unwrap_or_else(|| CacheEntry::new(FetchResponse::synthetic(data.clone())));

        entry.response.data = data;
        entry.timestamp = Instant::now();
        self.entries.insert(key.to_string(), entry);
        self.stats.record_mutation();
        self.emit(key, CacheEvent::Updated { key: key.to_string() });
    }

    /// Remove the entry for `key` and notify subscribers.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.emit(key, CacheEvent::Removed { key: key.to_string() });
        }
        removed
    }

    /// Drop every entry. Subscriptions survive.
    pub fn clear(&self) {
        while self.entries.pop_front().is_some() {}
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subscribe to change notifications for one key.
    pub fn subscribe(&self, key: &str) -> broadcast::Receiver<CacheEvent> {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers
            .entry(key.to_string())
            .or_insert_with(|| broadcast::channel(16).0)
            .subscribe()
    }

    /// Cache statistics.
    #[must_use]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn emit(&self, key: &str, event: CacheEvent) {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(sender) = subscribers.get(key) {
            // Send fails only when every receiver is gone; that is fine
            let _ = sender.send(event);
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(value: serde_json::Value) -> FetchResponse {
        FetchResponse::synthetic(ResponseData::Json(value))
    }

    #[test]
    fn fresh_entry_hits_within_ttl() {
        let store = CacheStore::new();
        store.set("k", response(json!({"v": 1})));

        let hit = store.get("k", Duration::from_secs(60)).unwrap();
        assert_eq!(hit.data, ResponseData::Json(json!({"v": 1})));
        assert_eq!(store.stats().hits.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[test]
    fn zero_cache_time_always_misses() {
        let store = CacheStore::new();
        store.set("k", response(json!(1)));
        assert!(store.get("k", Duration::ZERO).is_none());
    }

    #[test]
    fn mutate_is_immediately_visible() {
        let store = CacheStore::new();
        store.set("k", response(json!({"v": 1})));
        store.mutate("k", ResponseData::Json(json!({"v": 2})));

        let hit = store.get("k", Duration::from_secs(60)).unwrap();
        assert_eq!(hit.data, ResponseData::Json(json!({"v": 2})));
    }

    #[test]
    fn mutate_creates_synthetic_entry_when_missing() {
        let store = CacheStore::new();
        store.mutate("new", ResponseData::Json(json!([1, 2])));
        assert!(store.get("new", Duration::from_secs(60)).is_some());
    }

    #[test]
    fn delete_removes_and_reports() {
        let store = CacheStore::new();
        store.set("k", response(json!(1)));
        assert!(store.delete("k"));
        assert!(!store.delete("k"));
        assert!(store.get("k", Duration::from_secs(60)).is_none());
    }

    #[tokio::test]
    async fn subscribers_see_set_and_delete() {
        let store = CacheStore::new();
        let mut rx = store.subscribe("k");

        store.set("k", response(json!(1)));
        store.delete("k");

        assert!(matches!(rx.recv().await.unwrap(), CacheEvent::Updated { .. }));
        assert!(matches!(rx.recv().await.unwrap(), CacheEvent::Removed { .. }));
    }
}
