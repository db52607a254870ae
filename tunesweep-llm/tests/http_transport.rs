use std::time::Duration;

use httpmock::prelude::*;
use secrecy::SecretString;
use tunesweep_core::{PreparedRequest, SweepError, Transport};
use tunesweep_llm::HttpTransport;

fn request(url: String) -> PreparedRequest {
    PreparedRequest::new(
        url,
        r#"{"model":"gpt-3.5-turbo","temperature":0.6}"#,
        SecretString::new("sk-test".to_string()),
    )
}

#[tokio::test]
async fn http_transport_posts_body_with_headers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("Authorization", "Bearer sk-test")
                .header("Content-Type", "application/json")
                .body(r#"{"model":"gpt-3.5-turbo","temperature":0.6}"#);
            then.status(200).body(r#"{"ok":true}"#);
        })
        .await;

    let transport = HttpTransport::new(Duration::from_secs(5)).expect("transport");
    let response = transport
        .send(&request(server.url("/v1/chat/completions")))
        .await
        .expect("send");

    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"{"ok":true}"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn http_transport_returns_error_statuses_as_responses() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/edits");
            then.status(500).body("upstream exploded");
        })
        .await;

    let transport = HttpTransport::new(Duration::from_secs(5)).expect("transport");
    let response = transport
        .send(&request(server.url("/v1/edits")))
        .await
        .expect("status codes are not transport errors");

    assert_eq!(response.status, 500);
    assert!(!response.is_success());
    assert_eq!(response.body, "upstream exploded");
}

#[tokio::test]
async fn http_transport_maps_connection_failures() {
    let transport = HttpTransport::new(Duration::from_secs(5)).expect("transport");
    let err = transport
        .send(&request("http://127.0.0.1:1/v1/chat/completions".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, SweepError::Transport(_)));
}
