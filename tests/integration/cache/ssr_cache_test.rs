//! Rendered-page caching and invalidation through Redis

use link_ai::backend::cache::keys;
use link_ai::backend::pages::db;
use link_ai::backend::pages::types::NewPage;
use serde_json::json;
use serial_test::serial;

use crate::assert_contains;
use crate::common::auth_helpers::user_auth;
use crate::common::cache::test_cache;
use crate::common::database::{insert_user, test_pool};
use crate::common::{cached_state, test_server};
use crate::integration::api::UNUSED_BACKEND;

#[tokio::test]
#[serial]
async fn test_del_reports_whether_key_existed() {
    let Some(cache) = test_cache().await else { return };
    let key = keys::ssr_page("coffee", None);

    assert!(cache.set(&key, "<html></html>", Some(60)).await);
    assert!(cache.del(&key).await);
    assert!(!cache.del(&key).await);
    assert_eq!(cache.get::<String>(&key).await, None);
}

#[tokio::test]
#[serial]
async fn test_render_is_cached_until_page_update() {
    let Some(cache) = test_cache().await else { return };
    let Some(pool) = test_pool().await else { return };
    insert_user(&pool, "user-1").await.expect("insert user");
    let page = db::insert_page(
        &pool,
        &NewPage {
            title: "Coffee Shop".to_string(),
            slug: "coffee".to_string(),
            html_content: "<section><h1>Fresh coffee</h1></section>".to_string(),
            user_id: "user-1".to_string(),
            ..Default::default()
        },
    )
    .await
    .expect("insert page");
    let server = test_server(cached_state(UNUSED_BACKEND, pool, cache));

    let response = server.get("/coffee").await;
    response.assert_status_ok();
    assert_eq!(response.header("x-cache"), "MISS");

    let response = server.get("/coffee").await;
    response.assert_status_ok();
    assert_eq!(response.header("x-cache"), "HIT");
    assert_contains!(response.text(), "Fresh coffee");

    let (name, value) = user_auth("user-1");
    server
        .put(&format!("/api/ai-pages/{}", page.id))
        .add_header(name, value)
        .json(&json!({ "htmlContent": "<section><h1>Cold brew</h1></section>" }))
        .await
        .assert_status_ok();

    let response = server.get("/coffee").await;
    response.assert_status_ok();
    assert_eq!(response.header("x-cache"), "MISS");
    let html = response.text();
    assert_contains!(html, "Cold brew");
    assert!(!html.contains("Fresh coffee"));
}
