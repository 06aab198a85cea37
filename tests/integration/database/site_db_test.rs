//! Rendering and PWA routes backed by a real database

use axum::http::StatusCode;
use link_ai::backend::pages::db;
use link_ai::backend::pages::types::NewPage;
use serde_json::Value;
use serial_test::serial;

use crate::assert_contains;
use crate::common::auth_helpers::user_auth;
use crate::common::database::{insert_user, test_pool};
use crate::common::{database_state, test_server};
use crate::integration::api::UNUSED_BACKEND;

fn page(slug: &str, pwa_enabled: bool) -> NewPage {
    NewPage {
        title: "Coffee Shop".to_string(),
        slug: slug.to_string(),
        html_content: "<section><h1>Fresh coffee</h1></section>".to_string(),
        pwa_enabled,
        user_id: "user-1".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
#[serial]
async fn test_render_page_wraps_fragment() {
    let Some(pool) = test_pool().await else { return };
    db::insert_page(&pool, &page("coffee", false)).await.expect("insert page");
    let server = test_server(database_state(UNUSED_BACKEND, pool.clone()));

    let response = server.get("/coffee").await;
    response.assert_status_ok();
    assert_eq!(response.header("x-cache"), "MISS");

    let html = response.text();
    assert_contains!(html, "<!DOCTYPE html>");
    assert_contains!(html, "<title>Coffee Shop</title>");
    assert_contains!(html, "Fresh coffee");
    assert!(!html.contains("rel=\"manifest\""));

    let stored = db::find_by_slug(&pool, "coffee").await.expect("query").expect("page");
    assert_eq!(stored.views, 1);
}

#[tokio::test]
#[serial]
async fn test_missing_page_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    let server = test_server(database_state(UNUSED_BACKEND, pool));

    server.get("/nothing-here").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_pwa_assets_follow_flag() {
    let Some(pool) = test_pool().await else { return };
    db::insert_page(&pool, &page("app", true)).await.expect("insert page");
    db::insert_page(&pool, &page("plain", false)).await.expect("insert page");
    let server = test_server(database_state(UNUSED_BACKEND, pool));

    let response = server.get("/app/manifest.json").await;
    response.assert_status_ok();
    let manifest: Value = response.json();
    assert_eq!(manifest["start_url"], "/app");
    assert_eq!(manifest["scope"], "/app/");

    let response = server.get("/app/sw.js").await;
    response.assert_status_ok();
    assert_contains!(response.text(), "const SLUG = 'app'");

    server.get("/app/offline.html").await.assert_status_ok();

    let response = server.get("/plain/manifest.json").await;
    response.assert_status(StatusCode::NOT_FOUND);
    server.get("/plain/sw.js").await.assert_status(StatusCode::NOT_FOUND);
    server
        .get("/missing/manifest.json")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_owner_lists_and_deletes_pages() {
    let Some(pool) = test_pool().await else { return };
    insert_user(&pool, "user-1").await.expect("insert user");
    let created = db::insert_page(&pool, &page("coffee", false)).await.expect("insert page");
    let server = test_server(database_state(UNUSED_BACKEND, pool));

    let (name, value) = user_auth("user-1");
    let response = server.get("/api/ai-pages").add_header(name, value).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (name, value) = user_auth("user-1");
    let response = server
        .delete(&format!("/api/ai-pages/{}", created.id))
        .add_header(name, value)
        .await;
    response.assert_status_ok();

    let (name, value) = user_auth("user-1");
    server
        .get(&format!("/api/ai-pages/{}", created.id))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
