//! Server-rendered site routes and custom domains

use axum::http::{header, HeaderValue, StatusCode};

use super::UNUSED_BACKEND;
use crate::assert_contains;
use crate::common::mock_server::{mock_main_backend, mount_custom_domain};
use crate::common::{offline_state, test_server};

#[tokio::test]
async fn test_root_without_domain_is_not_found() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server.get("/").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_contains!(response.text(), "<html");
}

#[tokio::test]
async fn test_root_domain_redirects_to_root_page() {
    let backend = mock_main_backend().await;
    mount_custom_domain(
        &backend,
        "shop.example.com",
        None,
        true,
        "0d8f7a1e-9c61-4f0e-8d0c-3b1f2a9e5c11",
    )
    .await;
    let server = test_server(offline_state(&backend.uri()));

    let response = server
        .get("/")
        .add_header(header::HOST, HeaderValue::from_static("shop.example.com"))
        .await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "/root");
}

#[tokio::test]
async fn test_unknown_domain_is_ignored() {
    let backend = mock_main_backend().await;
    let server = test_server(offline_state(&backend.uri()));

    let response = server
        .get("/")
        .add_header(header::HOST, HeaderValue::from_static("nobody.example.com"))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_page_without_database_is_error_page() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    let response = server.get("/coffee").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_contains!(response.text(), "<html");
}

#[tokio::test]
async fn test_pwa_assets_without_database() {
    let server = test_server(offline_state(UNUSED_BACKEND));

    server
        .get("/coffee/manifest.json")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    server
        .get("/coffee/sw.js")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    server
        .get("/coffee/offline.html")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
