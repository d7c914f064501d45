//! Fluent chain against an injected transport.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::FutureExt;
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::Deserialize;
use serde_json::json;

use fetchkit::{ClientExt, ErrorStrategy, FetchClient, FetchFn, RawResponse};

fn client_returning(status: u16, body: serde_json::Value) -> FetchClient {
    let transport = Arc::new(FetchFn(move |request: fetchkit::TransportRequest| {
        let body = body.clone();
        let url = request.url.to_string();
        async move {
            let status = StatusCode::from_u16(status).unwrap();
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            Ok(RawResponse {
                status,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                headers,
                body: Bytes::from(serde_json::to_vec(&body).unwrap()),
                url,
            })
        }
        .boxed()
    }));
    FetchClient::with_transport(transport)
}

#[derive(Debug, Deserialize, PartialEq)]
struct Book {
    id: u32,
    title: String,
}

#[tokio::test]
async fn get_chain_resolves_and_deserializes() {
    let client = client_returning(200, json!([{"id": 1, "title": "Dune"}]));

    let books: Vec<Book> = client
        .get("https://api.example.com/books")
        .query("page", "1")
        .header("x-api-key", "k")
        .cache_time(Duration::from_secs(60))
        .send_as()
        .await
        .unwrap();

    assert_eq!(
        books,
        vec![Book { id: 1, title: "Dune".to_string() }]
    );
}

#[tokio::test]
async fn post_chain_sends_body_and_applies_strategy() {
    let client = client_returning(503, json!(null));

    let response = client
        .post("https://api.example.com/books")
        .json_value(json!({"title": "Hyperion"}))
        .strategy(ErrorStrategy::SoftFail)
        .send()
        .await
        .unwrap();

    assert!(!response.ok);
    assert!(response.error.is_some());
}

#[tokio::test]
async fn flatten_and_select_compose_in_the_chain() {
    let client = client_returning(200, json!({"data": {"items": [1, 2], "total": 2}}));

    let response = client
        .get("https://api.example.com/list")
        .flatten()
        .select(|value| value.get("items").cloned().unwrap_or(serde_json::Value::Null))
        .send()
        .await
        .unwrap();

    assert_eq!(response.json(), Some(&json!([1, 2])));
}

#[tokio::test]
async fn static_entry_points_share_the_process_default_client() {
    // Only the builder shape is checked here; no request is dispatched.
    let builder = fetchkit::Fetch::get("https://api.example.com/books");
    let debug = format!("{builder:?}");
    assert!(debug.contains("api.example.com/books"));
}
