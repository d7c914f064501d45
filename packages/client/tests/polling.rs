//! Polling re-issue behavior on the paused clock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use common::{MockTransport, Reply, client_with};
use fetchkit_client::{FetchResponse, PollingOptions, RequestConfig};

#[tokio::test(start_paused = true)]
async fn polls_until_should_stop_and_returns_last_response() {
    let transport = MockTransport::new(vec![
        Reply::Json(200, json!({"state": "pending"})),
        Reply::Json(200, json!({"state": "pending"})),
        Reply::Json(200, json!({"state": "done"})),
    ]);
    let client = client_with(transport.clone());

    let mut config = RequestConfig::get();
    config.polling = PollingOptions {
        interval: Duration::from_millis(500),
        should_stop: Some(Arc::new(|response: &FetchResponse, _attempt: u32| {
            response
                .json()
                .and_then(|v| v.get("state"))
                .is_some_and(|s| s == "done")
        })),
        ..PollingOptions::default()
    };

    let response = client
        .request("https://api.example.com/job/42", config)
        .await
        .unwrap();

    assert_eq!(transport.call_count(), 3);
    assert_eq!(response.json(), Some(&json!({"state": "done"})));

    let offsets = transport.call_offsets();
    assert_eq!((offsets[1] - offsets[0]).as_millis(), 500);
    assert_eq!((offsets[2] - offsets[1]).as_millis(), 500);
}

#[tokio::test(start_paused = true)]
async fn max_attempts_caps_polling() {
    let transport = MockTransport::new(vec![Reply::Json(200, json!({"state": "pending"}))]);
    let client = client_with(transport.clone());

    let mut config = RequestConfig::get();
    config.polling = PollingOptions {
        interval: Duration::from_millis(100),
        max_attempts: 3,
        should_stop: Some(Arc::new(|_: &FetchResponse, _: u32| false)),
        ..PollingOptions::default()
    };

    let response = client
        .request("https://api.example.com/job/42", config)
        .await
        .unwrap();

    assert_eq!(transport.call_count(), 3);
    assert!(response.ok);
}

#[tokio::test(start_paused = true)]
async fn initial_delay_applies_once_before_the_first_repoll() {
    let transport = MockTransport::new(vec![Reply::Json(200, json!({"state": "pending"}))]);
    let client = client_with(transport.clone());

    let mut config = RequestConfig::get();
    config.polling = PollingOptions {
        interval: Duration::from_millis(100),
        delay: Duration::from_millis(300),
        max_attempts: 3,
        should_stop: None,
        ..PollingOptions::default()
    };

    client
        .request("https://api.example.com/job/42", config)
        .await
        .unwrap();

    let offsets = transport.call_offsets();
    assert_eq!(offsets.len(), 3);
    assert_eq!((offsets[1] - offsets[0]).as_millis(), 400);
    assert_eq!((offsets[2] - offsets[1]).as_millis(), 100);
}

#[tokio::test(start_paused = true)]
async fn an_error_during_polling_stops_the_loop() {
    let transport = MockTransport::new(vec![
        Reply::Json(200, json!({"state": "pending"})),
        Reply::Json(500, json!({"err": true})),
    ]);
    let client = client_with(transport.clone());

    let mut config = RequestConfig::get();
    config.polling = PollingOptions {
        interval: Duration::from_millis(100),
        should_stop: Some(Arc::new(|_: &FetchResponse, _: u32| false)),
        ..PollingOptions::default()
    };

    let result = client
        .request("https://api.example.com/job/42", config)
        .await;

    assert!(result.is_err());
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_disables_polling() {
    let transport = MockTransport::new(vec![Reply::Json(200, json!({"state": "pending"}))]);
    let client = client_with(transport.clone());

    let response = client
        .request("https://api.example.com/job/42", RequestConfig::get())
        .await
        .unwrap();

    assert_eq!(transport.call_count(), 1);
    assert!(response.ok);
}
