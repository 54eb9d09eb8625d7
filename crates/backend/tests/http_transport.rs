//! Integration tests for `HttpTransport` against a real HTTP server.
//!
//! The unit tests in `src/` exercise every client against
//! `MockTransport`; these tests pin down the one layer the mock cannot
//! cover: header placement, multipart encoding and timeout behavior of
//! the reqwest-backed transport.

use std::sync::Arc;
use std::time::Duration;

use doci_backend::{
    HttpTransport, ManuscriptClient, ProfileClient, SponsorClient, SponsoredTransactionType,
};
use doci_common::types::SubmissionDraft;
use doci_common::ClientError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(uri: &str) -> Arc<HttpTransport> {
    Arc::new(HttpTransport::new(uri, Duration::from_secs(2)).expect("transport"))
}

fn draft() -> SubmissionDraft {
    SubmissionDraft {
        title: "Integration".into(),
        authors: vec!["A. Author".into()],
        categories: vec!["cs".into()],
        abstract_text: "An abstract.".into(),
        keywords: vec![],
        file_name: "paper.pdf".into(),
        file_bytes: vec![0u8; 512],
        mime_type: "application/pdf".into(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// WIRE-LEVEL BEHAVIOR
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_cv_status_hits_wallet_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/manuscripts/check-cv-status/wallet1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"success":true,"hasCV":true,"canSubmitManuscripts":true}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = ProfileClient::new(transport(&mock_server.uri()));
    let status = client.check_cv_status("wallet1").await.expect("status");
    assert!(status.has_cv);
    assert!(status.can_submit_manuscripts);
}

#[tokio::test]
async fn test_cv_status_404_is_benign_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"no cv"}"#))
        .mount(&mock_server)
        .await;

    let client = ProfileClient::new(transport(&mock_server.uri()));
    let status = client.check_cv_status("fresh").await.expect("benign 404");
    assert!(!status.has_cv);
}

#[tokio::test]
async fn test_sponsor_sends_bearer_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions/sponsor-gas"))
        .and(header("authorization", "Bearer session-abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"success":true,"signature":"sigX","gasUsed":5000}"#),
        )
        .mount(&mock_server)
        .await;

    let client = SponsorClient::new(transport(&mock_server.uri()));
    let result = client
        .sponsor_transaction(
            Some("session-abc"),
            "dHg=",
            SponsoredTransactionType::ManuscriptSubmission,
            serde_json::json!({"wallet": "w", "idempotencyKey": "k1"}),
        )
        .await
        .expect("sponsored");
    assert_eq!(result.signature, "sigX");
}

#[tokio::test]
async fn test_submit_manuscript_multipart_roundtrip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/manuscripts/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"success":true,"manuscriptId":"m1","cid":"bafy1","gatewayUrl":"https://gw/bafy1"}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ManuscriptClient::new(transport(&mock_server.uri()));
    let receipt = client
        .submit_manuscript("w", &draft(), "sig1", "key1")
        .await
        .expect("receipt");
    assert_eq!(receipt.manuscript_id, "m1");
    assert_eq!(receipt.gateway_url, "https://gw/bafy1");
}

#[tokio::test]
async fn test_429_maps_to_rate_limited_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("too many requests"))
        .mount(&mock_server)
        .await;

    let client = ProfileClient::new(transport(&mock_server.uri()));
    let err = client.fetch_profile("w").await.expect_err("limited");
    assert_eq!(err, ClientError::RateLimited);
}

#[tokio::test]
async fn test_slow_server_times_out_as_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let slow = Arc::new(
        HttpTransport::new(mock_server.uri(), Duration::from_millis(200)).expect("transport"),
    );
    let err = ProfileClient::new(slow)
        .fetch_profile("w")
        .await
        .expect_err("timeout");
    assert!(matches!(err, ClientError::NetworkError(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Port 1 is never listening.
    let client = ProfileClient::new(transport("http://127.0.0.1:1"));
    let err = client.fetch_profile("w").await.expect_err("refused");
    assert!(err.is_retryable());
}
