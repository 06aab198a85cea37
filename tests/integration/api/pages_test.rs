//! Authentication and dependency checks on the page API

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::UNUSED_BACKEND;
use crate::assert_json_error;
use crate::common::auth_helpers::{bearer, user_auth};
use crate::common::{offline_state, test_server};

#[tokio::test]
async fn test_list_requires_token() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server.get("/api/ai-pages").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stream_requires_token() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server
        .post("/api/ai-pages/stream")
        .json(&json!({ "prompt": "A bakery landing page" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let server = test_server(offline_state(UNUSED_BACKEND));
    let (name, value) = bearer("not-a-jwt");

    let response = server.get("/api/ai-pages").add_header(name, value).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_without_database_is_unavailable() {
    let server = test_server(offline_state(UNUSED_BACKEND));
    let (name, value) = user_auth("user-1");

    let response = server.get("/api/ai-pages").add_header(name, value).await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json();
    assert_eq!(body["status"], 503);
}

#[tokio::test]
async fn test_public_page_without_database() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server.get("/api/public/coffee").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_json_error!(response, "Database is not configured");
}
