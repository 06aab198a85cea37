//! Analytics beacon tests

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::UNUSED_BACKEND;
use crate::assert_json_error;
use crate::common::auth_helpers::user_auth;
use crate::common::{offline_state, test_server};

#[tokio::test]
async fn test_track_requires_page_fields() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server
        .post("/api/analytics/track")
        .json(&json!({ "pageType": "AI_PAGE" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_json_error!(response, "pageId and pageType are required");

    let response = server
        .post("/api/analytics/track")
        .json(&json!({ "pageId": "" , "pageType": "AI_PAGE" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_track_accepts_view_without_database() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server
        .post("/api/analytics/track")
        .json(&json!({
            "pageId": "0d8f7a1e-9c61-4f0e-8d0c-3b1f2a9e5c11",
            "pageType": "AI_PAGE",
            "sessionId": "s-1",
            "screenWidth": 1920,
            "screenHeight": 1080,
            "sessionDuration": 12,
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_track_rejects_unknown_page_type_with_400() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server
        .post("/api/analytics/track")
        .json(&json!({ "pageId": "page-1", "pageType": "PROFILE" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_json_error!(response, "pageType must be AI_PAGE, BIOLINK or SHORTLINK");
}

#[tokio::test]
async fn test_track_accepts_fractional_numbers() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server
        .post("/api/analytics/track")
        .json(&json!({
            "pageId": "page-1",
            "pageType": "BIOLINK",
            "screenWidth": 1280.5,
            "pageLoadTime": 1532.25,
            "pixelRatio": 2.0,
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_stats_require_token() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server.get("/api/analytics/stats/some-page").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let (name, value) = user_auth("user-1");
    let response = server
        .get("/api/analytics/stats/some-page")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
