//! Mock main backend for integration tests

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A main backend that knows no custom domains and accepts syncs
pub async fn mock_main_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/domains/lookup"))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(10)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ai-pages/sync"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

/// Resolve `domain` to a custom domain bound to `page_id`
pub async fn mount_custom_domain(
    server: &MockServer,
    domain: &str,
    slug: Option<&str>,
    is_root_domain: bool,
    page_id: &str,
) {
    Mock::given(method("POST"))
        .and(path("/api/domains/lookup"))
        .and(body_json(json!({ "domain": domain })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "domain": {
                "domain": domain,
                "slug": slug,
                "isRootDomain": is_root_domain,
                "pageId": page_id,
                "status": "ACTIVE",
            }
        })))
        .with_priority(1)
        .mount(server)
        .await;
}
