//! Metrics and cache administration endpoints

use axum::http::StatusCode;
use serde_json::Value;

use super::UNUSED_BACKEND;
use crate::assert_contains;
use crate::common::auth_helpers::{admin_auth, user_auth};
use crate::common::{offline_state, test_server};

#[tokio::test]
async fn test_prometheus_exposition() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    server.get("/health").await.assert_status_ok();

    let response = server.get("/metrics").await;
    response.assert_status_ok();

    let content_type = response.header("content-type");
    assert_contains!(content_type.to_str().expect("ascii header"), "text/plain");

    let text = response.text();
    assert_contains!(text, "# TYPE http_requests_total counter");
    assert_contains!(
        text,
        "http_requests_total{method=\"GET\",route=\"/health\",status=\"200\"} 1"
    );
    assert_contains!(text, "active_pages_total 0");
}

#[tokio::test]
async fn test_cache_stats_when_redis_is_missing() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server.get("/metrics/cache").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["connected"], false);
    assert_eq!(body["dbSize"], 0);
}

#[tokio::test]
async fn test_database_stats_without_database() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    server
        .get("/metrics/database")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_cache_clear_is_admin_only() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    server
        .post("/metrics/cache/clear")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let (name, value) = user_auth("user-1");
    server
        .post("/metrics/cache/clear")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let (name, value) = admin_auth("admin-1");
    let response = server.post("/metrics/cache/clear").add_header(name, value).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], "All cache entries were cleared");
}

#[tokio::test]
async fn test_clear_rendered_pages() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server.post("/api/clear-cache").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
}
