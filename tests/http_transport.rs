//! HttpTransport and DocumentClient against a mock document endpoint.

use docrate::{
    DocumentClient, DocumentTransport, Error, HttpTransport, IntroductionDocument, Product,
    RateLimiter,
};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCS_PATH: &str = "/api/v1/incoming-documents/unsigned-events";

fn transport(server: &MockServer) -> HttpTransport {
    let client = Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to create HTTP client");
    HttpTransport::with_client(client, format!("{}{}", server.uri(), DOCS_PATH))
}

#[tokio::test]
async fn test_post_sends_json_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DOCS_PATH))
        .and(header("Authorization", "Bearer sig-123"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "doc_id": "d-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"value\":\"accepted\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let body = transport(&server)
        .post_json(br#"{"doc_id":"d-1"}"#.to_vec(), "sig-123")
        .await
        .unwrap();

    assert_eq!(body, "{\"value\":\"accepted\"}");
}

#[tokio::test]
async fn test_empty_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DOCS_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let body = transport(&server).post_json(b"{}".to_vec(), "t").await.unwrap();
    assert_eq!(body, "");
}

#[tokio::test]
async fn test_non_success_status_maps_to_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DOCS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad signature"))
        .mount(&server)
        .await;

    let err = transport(&server).post_json(b"{}".to_vec(), "t").await.unwrap_err();
    match err {
        Error::Server { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad signature");
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_unavailable_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = transport(&server).post_json(b"{}".to_vec(), "t").await.unwrap_err();
    assert!(err.is_retryable());
    assert!(!err.is_rate_limited());
}

#[tokio::test]
async fn test_client_sends_document_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DOCS_PATH))
        .and(body_json(json!({
            "doc_id": "d-2",
            "doc_type": "LP_INTRODUCE_GOODS",
            "participant_inn": "7700000000",
            "description": { "participantInn": "7700000000" },
            "products": [{ "uit_code": "0104600000000000" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let limiter = Arc::new(RateLimiter::new(1, Duration::from_secs(3600)).unwrap());
    let client = DocumentClient::new(limiter, transport(&server));

    let doc = IntroductionDocument::new()
        .with_doc_id("d-2")
        .with_participant("7700000000")
        .with_product(Product {
            uit_code: Some("0104600000000000".into()),
            ..Default::default()
        });

    assert_eq!(client.create_document(&doc, "sig").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_denied_submission_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let limiter = Arc::new(RateLimiter::new(2, Duration::from_secs(3600)).unwrap());
    let client = DocumentClient::new(limiter, transport(&server));
    let doc = IntroductionDocument::new();

    let mut denied = 0;
    for _ in 0..5 {
        if let Err(err) = client.submit(&doc, "sig").await {
            assert!(err.is_rate_limited());
            denied += 1;
        }
    }
    assert_eq!(denied, 3);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
}
