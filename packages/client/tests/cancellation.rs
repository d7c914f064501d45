//! Supersession, manual aborts, and per-attempt timeouts.

mod common;

use std::time::Duration;

use serde_json::json;

use common::{MockTransport, Reply, client_with};
use fetchkit_client::{AbortReason, RequestConfig};

fn cancellable_get() -> RequestConfig {
    let mut config = RequestConfig::get();
    config.cancellable = true;
    config
}

#[tokio::test(start_paused = true)]
async fn newer_request_supersedes_and_older_resolves_with_default() {
    let transport = MockTransport::new(vec![
        Reply::Hang,
        Reply::Json(200, json!({"winner": true})),
    ]);
    let client = client_with(transport.clone());
    let url = "https://api.example.com/search";

    let mut config = cancellable_get();
    config.default_response = Some(json!({"results": []}));

    let older = {
        let client = client.clone();
        let config = config.clone();
        tokio::spawn(async move { client.request(url, config).await })
    };
    tokio::task::yield_now().await;

    let newer = client.request(url, config).await.unwrap();
    assert_eq!(newer.json(), Some(&json!({"winner": true})));

    // reject_cancelled is false, so the superseded request resolves with
    // the default-response shape and the cancellation in its error slot.
    let older = older.await.unwrap().unwrap();
    assert!(!older.ok);
    assert_eq!(older.json(), Some(&json!({"results": []})));
    assert!(older.error.as_ref().unwrap().is_cancellation());
    assert_eq!(client.stats().cancelled_requests, 1);
}

#[tokio::test(start_paused = true)]
async fn reject_cancelled_turns_supersession_into_an_error() {
    let transport = MockTransport::new(vec![
        Reply::Hang,
        Reply::Json(200, json!({"winner": true})),
    ]);
    let client = client_with(transport.clone());
    let url = "https://api.example.com/search";

    let mut config = cancellable_get();
    config.reject_cancelled = true;

    let older = {
        let client = client.clone();
        let config = config.clone();
        tokio::spawn(async move { client.request(url, config).await })
    };
    tokio::task::yield_now().await;

    client.request(url, config).await.unwrap();

    let err = older.await.unwrap().unwrap_err();
    assert!(err.is_cancellation());
    assert!(!err.is_timeout());
}

#[tokio::test(start_paused = true)]
async fn non_cancellable_requests_survive_a_newer_arrival() {
    let transport = MockTransport::with_latency(
        vec![
            Reply::Json(200, json!({"first": true})),
            Reply::Json(200, json!({"second": true})),
        ],
        Duration::from_millis(50),
    );
    let client = client_with(transport.clone());
    let url = "https://api.example.com/search";

    // Tracked (so it sits in the queue) but not cancellable.
    let mut config = RequestConfig::get();
    config.dedupe_time = Duration::from_millis(1);

    let older = {
        let client = client.clone();
        let config = config.clone();
        tokio::spawn(async move { client.request(url, config).await })
    };
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_millis(5)).await;

    let newer = client.request(url, config).await.unwrap();
    let older = older.await.unwrap().unwrap();

    assert!(older.ok);
    assert_eq!(older.json(), Some(&json!({"first": true})));
    assert!(newer.ok);
}

#[tokio::test(start_paused = true)]
async fn manual_abort_through_the_queue() {
    let transport = MockTransport::new(vec![Reply::Hang]);
    let client = client_with(transport.clone());
    let url = "https://api.example.com/slow";

    let mut config = cancellable_get();
    config.reject_cancelled = true;

    let pending = {
        let client = client.clone();
        tokio::spawn(async move { client.request(url, config).await })
    };
    tokio::task::yield_now().await;

    assert_eq!(client.queue().len(), 1);
    assert!(
        client
            .queue()
            .abort("GET|httpsapiexamplecomslow", AbortReason::Superseded)
    );

    let err = pending.await.unwrap().unwrap_err();
    assert!(err.is_cancellation());
    assert!(client.queue().is_empty());
}

#[tokio::test(start_paused = true)]
async fn per_attempt_timeout_aborts_with_timeout_reason() {
    let transport = MockTransport::new(vec![Reply::Hang]);
    let client = client_with(transport.clone());

    let mut config = RequestConfig::get();
    config.timeout = Some(Duration::from_millis(200));
    config.reject_cancelled = true;

    let err = client
        .request("https://api.example.com/slow", config)
        .await
        .unwrap_err();

    assert!(err.is_timeout());
}

#[tokio::test(start_paused = true)]
async fn cancellation_is_never_retried() {
    let transport = MockTransport::new(vec![Reply::Hang]);
    let client = client_with(transport.clone());

    let mut config = RequestConfig::get();
    config.timeout = Some(Duration::from_millis(100));
    config.reject_cancelled = true;
    config.retry.retries = 3;
    config.retry.delay = Duration::from_millis(10);

    let err = client
        .request("https://api.example.com/slow", config)
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(transport.call_count(), 1);
}
