//! Streaming generation against a real database and a mocked Claude API

use std::time::Duration;

use axum::http::StatusCode;
use link_ai::backend::auth::Role;
use link_ai::backend::pages::db;
use link_ai::backend::pages::types::NewPage;
use link_ai::backend::routes::create_router;
use serde_json::{json, Value};
use serial_test::serial;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::assert_json_error;
use crate::common::auth_helpers::{token_for, user_auth};
use crate::common::database::{credits_available, grant_plan, insert_user, test_pool, transaction_count};
use crate::common::mock_server::mock_main_backend;
use crate::common::{generation_state, test_server};

const USER: &str = "user-1";

fn page_html() -> String {
    format!("<section>{}</section>", "<p>Fresh bread every morning</p>".repeat(20))
}

/// Claude endpoint answering every completion with `html`
async fn mock_claude(html: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": html}]
        })))
        .mount(&server)
        .await;
    server
}

/// Claude endpoint that must not be called
async fn unused_claude() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    server
}

/// `data:` payloads of an SSE body
fn events(body: &str) -> Vec<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim_start()).expect("event is JSON"))
        .collect()
}

fn edit_request(id: &str) -> Value {
    json!({
        "id": id,
        "prompt": "make the header blue",
        "messages": [
            {"role": "system", "content": "MODO EDIÇÃO PONTUAL: altere apenas o pedido"},
            {"role": "user", "content": "make the header blue"}
        ]
    })
}

#[tokio::test]
#[serial]
async fn test_stream_creates_page_and_charges_credits() {
    let Some(pool) = test_pool().await else { return };
    insert_user(&pool, USER).await.expect("insert user");
    grant_plan(&pool, USER, "Pro", 10.0).await.expect("grant plan");
    let backend = mock_main_backend().await;
    let html = page_html();
    let claude = mock_claude(&html).await;
    let server = test_server(generation_state(&backend.uri(), &claude.uri(), pool.clone(), true));
    let (name, value) = user_auth(USER);

    let response = server
        .post("/api/ai-pages/stream")
        .add_header(name, value)
        .json(&json!({ "title": "Bakery", "prompt": "A bakery landing page" }))
        .await;
    response.assert_status_ok();
    assert!(response
        .header("content-type")
        .to_str()
        .expect("ascii header")
        .starts_with("text/event-stream"));

    let events = events(&response.text());
    assert!(events.len() >= 3, "expected start, content and done: {events:?}");
    assert_eq!(events[0]["type"], "start");
    assert_eq!(events[0]["message"], "Starting page creation...");

    let (done, chunks) = events[1..].split_last().expect("events after start");
    assert!(chunks.iter().all(|event| event["type"] == "content"));
    let replayed: String = chunks
        .iter()
        .map(|event| event["content"].as_str().expect("chunk text"))
        .collect();
    assert_eq!(replayed, html);

    assert_eq!(done["type"], "done");
    assert_eq!(done["page"]["slug"], "bakery");
    assert_eq!(done["page"]["title"], "Bakery");

    let stored = db::find_by_slug(&pool, "bakery").await.expect("query").expect("page saved");
    assert_eq!(stored.user_id, USER);
    assert_eq!(stored.html_content, html);
    assert_eq!(credits_available(&pool, USER).await, 8.0);
    assert_eq!(transaction_count(&pool, USER).await, 1);
}

#[tokio::test]
#[serial]
async fn test_stream_without_plan_sends_credit_error() {
    let Some(pool) = test_pool().await else { return };
    insert_user(&pool, USER).await.expect("insert user");
    let claude = unused_claude().await;
    let server = test_server(generation_state(&claude.uri(), &claude.uri(), pool.clone(), true));
    let (name, value) = user_auth(USER);

    let response = server
        .post("/api/ai-pages/stream")
        .add_header(name, value)
        .json(&json!({ "prompt": "A bakery landing page" }))
        .await;
    response.assert_status_ok();

    let events = events(&response.text());
    assert_eq!(events.len(), 1);
    let error = &events[0];
    assert_eq!(error["type"], "error");
    assert_eq!(error["error"], "INSUFFICIENT_CREDITS:2:criação:NO_PLAN:false:true:None:0");
    assert_eq!(error["code"], "INSUFFICIENT_CREDITS");
    assert_eq!(error["action"], "criação");
    assert_eq!(error["requiredCredits"], 2.0);
    assert_eq!(error["status"], "NO_PLAN");

    assert!(db::list_pages(&pool, Some(USER)).await.expect("list").is_empty());
}

#[tokio::test]
#[serial]
async fn test_stream_edit_with_low_balance_names_the_edit() {
    let Some(pool) = test_pool().await else { return };
    insert_user(&pool, USER).await.expect("insert user");
    grant_plan(&pool, USER, "Pro", 1.0).await.expect("grant plan");
    let page = db::insert_page(
        &pool,
        &NewPage {
            title: "Bakery".to_string(),
            slug: "bakery".to_string(),
            html_content: "<section>old</section>".to_string(),
            user_id: USER.to_string(),
            ..Default::default()
        },
    )
    .await
    .expect("insert page");
    let claude = unused_claude().await;
    let server = test_server(generation_state(&claude.uri(), &claude.uri(), pool.clone(), true));
    let (name, value) = user_auth(USER);

    let response = server
        .post("/api/ai-pages/stream")
        .add_header(name, value)
        .json(&edit_request(&page.id.to_string()))
        .await;
    response.assert_status_ok();

    let events = events(&response.text());
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0]["error"],
        "INSUFFICIENT_CREDITS:1.4:edição:NO_CREDITS:true:false:Pro:1"
    );
    assert_eq!(events[0]["action"], "edição");
    assert_eq!(credits_available(&pool, USER).await, 1.0);
}

#[tokio::test]
#[serial]
async fn test_stream_without_main_database_sends_credit_error() {
    let Some(pool) = test_pool().await else { return };
    insert_user(&pool, USER).await.expect("insert user");
    let claude = unused_claude().await;
    let server = test_server(generation_state(&claude.uri(), &claude.uri(), pool, false));
    let (name, value) = user_auth(USER);

    let response = server
        .post("/api/ai-pages/stream")
        .add_header(name, value)
        .json(&json!({ "prompt": "A bakery landing page" }))
        .await;
    response.assert_status_ok();

    let events = events(&response.text());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "error");
    assert_eq!(events[0]["code"], "INSUFFICIENT_CREDITS");
    assert_eq!(events[0]["status"], "NO_PLAN");
}

#[tokio::test]
#[serial]
async fn test_stream_edit_of_foreign_page_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    insert_user(&pool, USER).await.expect("insert user");
    grant_plan(&pool, USER, "Pro", 10.0).await.expect("grant plan");
    let foreign = db::insert_page(
        &pool,
        &NewPage {
            title: "Someone else".to_string(),
            slug: "someone-else".to_string(),
            html_content: "<section>theirs</section>".to_string(),
            user_id: "user-2".to_string(),
            ..Default::default()
        },
    )
    .await
    .expect("insert page");
    let claude = unused_claude().await;
    let server = test_server(generation_state(&claude.uri(), &claude.uri(), pool.clone(), true));
    let (name, value) = user_auth(USER);

    let response = server
        .post("/api/ai-pages/stream")
        .add_header(name, value)
        .json(&edit_request(&foreign.id.to_string()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_json_error!(response, "Page not found");

    assert_eq!(credits_available(&pool, USER).await, 10.0);
    assert_eq!(transaction_count(&pool, USER).await, 0);
}

#[tokio::test]
#[serial]
async fn test_disconnected_client_still_saves_and_charges() {
    let Some(pool) = test_pool().await else { return };
    insert_user(&pool, USER).await.expect("insert user");
    grant_plan(&pool, USER, "Pro", 10.0).await.expect("grant plan");
    let backend = mock_main_backend().await;
    let claude = mock_claude(&page_html().repeat(10)).await;
    let state = generation_state(&backend.uri(), &claude.uri(), pool.clone(), true);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.expect("serve");
    });

    let token = token_for(USER, Role::User);
    let mut response = reqwest::Client::new()
        .post(format!("http://{address}/api/ai-pages/stream"))
        .bearer_auth(token)
        .json(&json!({ "title": "Bakery", "prompt": "A bakery landing page" }))
        .send()
        .await
        .expect("stream request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let first = response.chunk().await.expect("first chunk").expect("stream open");
    assert!(String::from_utf8_lossy(&first).contains("\"start\""));
    drop(response);

    let mut saved = None;
    for _ in 0..50 {
        if transaction_count(&pool, USER).await == 1 {
            saved = db::find_by_slug(&pool, "bakery").await.expect("query");
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let saved = saved.expect("page saved after the client left");
    assert_eq!(saved.user_id, USER);
    assert_eq!(credits_available(&pool, USER).await, 8.0);
}
