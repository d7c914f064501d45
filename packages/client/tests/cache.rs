//! Cache behavior through the full pipeline.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use common::{MockTransport, Reply, client_with};
use fetchkit_client::{RequestConfig, ResponseData};

fn cached_get(ttl: Duration) -> RequestConfig {
    let mut config = RequestConfig::get();
    config.cache.cache_time = ttl;
    config
}

#[tokio::test(start_paused = true)]
async fn second_request_within_ttl_hits_cache() {
    let transport = MockTransport::new(vec![Reply::Json(200, json!([{"id": 1}]))]);
    let client = client_with(transport.clone());
    let url = "https://api.example.com/books?page=1";

    let first = client
        .request(url, cached_get(Duration::from_secs(60)))
        .await
        .unwrap();
    let second = client
        .request(url, cached_get(Duration::from_secs(60)))
        .await
        .unwrap();

    assert_eq!(transport.call_count(), 1);
    assert_eq!(first.json(), second.json());
    assert_eq!(client.stats().cache_hits, 1);
}

#[tokio::test(start_paused = true)]
async fn stale_entry_refetches() {
    let transport = MockTransport::new(vec![
        Reply::Json(200, json!({"v": 1})),
        Reply::Json(200, json!({"v": 2})),
    ]);
    let client = client_with(transport.clone());
    let url = "https://api.example.com/resource";

    client
        .request(url, cached_get(Duration::from_secs(5)))
        .await
        .unwrap();
    tokio::time::advance(Duration::from_secs(6)).await;
    let second = client
        .request(url, cached_get(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(transport.call_count(), 2);
    assert_eq!(second.json(), Some(&json!({"v": 2})));
}

#[tokio::test(start_paused = true)]
async fn cache_buster_bypasses_read_but_still_writes() {
    let transport = MockTransport::new(vec![
        Reply::Json(200, json!({"v": 1})),
        Reply::Json(200, json!({"v": 2})),
        Reply::Json(200, json!({"v": 3})),
    ]);
    let client = client_with(transport.clone());
    let url = "https://api.example.com/resource";

    client
        .request(url, cached_get(Duration::from_secs(60)))
        .await
        .unwrap();

    let mut busted = cached_get(Duration::from_secs(60));
    busted.cache.cache_buster = Some(Arc::new(|_: &str, _: &RequestConfig| true));
    let refreshed = client.request(url, busted).await.unwrap();
    assert_eq!(refreshed.json(), Some(&json!({"v": 2})));

    // The busted call overwrote the entry, so a plain read sees v=2.
    let plain = client
        .request(url, cached_get(Duration::from_secs(60)))
        .await
        .unwrap();
    assert_eq!(transport.call_count(), 2);
    assert_eq!(plain.json(), Some(&json!({"v": 2})));
}

#[tokio::test(start_paused = true)]
async fn skip_cache_prevents_the_write() {
    let transport = MockTransport::new(vec![
        Reply::Json(200, json!({"v": 1})),
        Reply::Json(200, json!({"v": 2})),
    ]);
    let client = client_with(transport.clone());
    let url = "https://api.example.com/resource";

    let mut skipping = cached_get(Duration::from_secs(60));
    skipping.cache.skip_cache = Some(Arc::new(|_: &_, _: &_| true));
    client.request(url, skipping).await.unwrap();

    client
        .request(url, cached_get(Duration::from_secs(60)))
        .await
        .unwrap();
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn mutate_is_visible_and_revalidate_fetches_exactly_once() {
    let transport = MockTransport::new(vec![
        Reply::Json(200, json!({"v": 1})),
        Reply::Json(200, json!({"v": 2})),
    ]);
    let client = client_with(transport.clone());
    let url = "https://api.example.com/resource";

    client
        .request(url, cached_get(Duration::from_secs(60)))
        .await
        .unwrap();
    let key = "GET|httpsapiexamplecomresource";

    client.mutate(key, ResponseData::Json(json!({"v": 99})));
    let cached = client.get_cache(key).unwrap();
    assert_eq!(cached.json(), Some(&json!({"v": 99})));

    let fresh = client.revalidate(key).await.unwrap();
    assert_eq!(transport.call_count(), 2);
    assert_eq!(fresh.json(), Some(&json!({"v": 2})));
    assert_eq!(
        client.get_cache(key).unwrap().json(),
        Some(&json!({"v": 2}))
    );
}

#[tokio::test(start_paused = true)]
async fn custom_cache_key_controls_identity() {
    let transport = MockTransport::new(vec![Reply::Json(200, json!(1))]);
    let client = client_with(transport.clone());

    let mut config = cached_get(Duration::from_secs(60));
    config.cache.cache_key = Some(Arc::new(|_: &str, _: &RequestConfig| "pinned".to_string()));

    client
        .request("https://api.example.com/a", config.clone())
        .await
        .unwrap();
    client
        .request("https://api.example.com/b", config)
        .await
        .unwrap();

    // Both URLs share the pinned key, so the second is a cache hit.
    assert_eq!(transport.call_count(), 1);
    assert!(client.get_cache("pinned").is_some());
}
