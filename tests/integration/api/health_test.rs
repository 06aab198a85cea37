//! Health check and fallback tests

use axum::http::StatusCode;
use serde_json::Value;

use super::UNUSED_BACKEND;
use crate::common::{offline_state, test_server};

#[tokio::test]
async fn test_health_reports_service() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "link-ai-microservice");
    assert!(body["timestamp"].as_str().is_some_and(|t| t.contains('T')));
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server.get("/api/does/not/exist").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"], "Endpoint not found");
    assert_eq!(body["path"], "/api/does/not/exist");
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server.get("/health").await;
    let csp = response.header("content-security-policy");
    let csp = csp.to_str().expect("ascii header");
    assert!(csp.contains("frame-ancestors"));
}
