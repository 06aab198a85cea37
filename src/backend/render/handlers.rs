/**
 * Server-Side Rendering Handlers
 *
 * `GET /{slug}` renders a stored page into a complete HTML document and
 * caches the result in Redis. `GET /` redirects a custom root domain to its
 * `root` page.
 *
 * Every render counts a view, including cache hits.
 */

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};

use super::document::render_document;
use super::pwa_tags::{asset_base, ROOT_SLUG};
use super::resolve::resolve_page;
use crate::backend::cache::keys::{self, SSR_TTL_SECS};
use crate::backend::middleware::MaybeCustomDomain;
use crate::backend::pages::db;
use crate::backend::server::state::AppState;

const CACHE_KIND: &str = "ssr";

/// `X-Cache` header
pub const X_CACHE: &str = "x-cache";

fn status_page(title: &str, heading: &str, detail: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
</head>
<body>
  <div style="display: flex; align-items: center; justify-content: center; min-height: 100vh; font-family: system-ui;">
    <div style="text-align: center;">
      <h1 style="font-size: 2rem; margin-bottom: 1rem;">{heading}</h1>
      <p style="color: #666;">{detail}</p>
    </div>
  </div>
</body>
</html>"#
    )
}

pub fn not_found_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(status_page(
            "Page not found",
            "404 - Page not found",
            "The page you are looking for does not exist.",
        )),
    )
        .into_response()
}

pub fn error_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(status_page(
            "Internal error",
            "500 - Internal error",
            "Something went wrong while loading the page.",
        )),
    )
        .into_response()
}

/// HTML response tagged with `X-Cache: HIT|MISS`
pub fn cached_html(html: String, hit: bool) -> Response {
    let mut response = Html(html).into_response();
    response.headers_mut().insert(
        X_CACHE,
        HeaderValue::from_static(if hit { "HIT" } else { "MISS" }),
    );
    response
}

/// `GET /{slug}`
pub async fn render_page(
    State(state): State<AppState>,
    custom_domain: MaybeCustomDomain,
    Path(slug): Path<String>,
) -> Response {
    let pool = match state.db() {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Cannot render {}: {}", slug, e);
            return error_page();
        }
    };

    let page = match resolve_page(pool, &state.metrics, &slug, custom_domain.0.as_ref()).await {
        Ok(Some(page)) => page,
        Ok(None) => return not_found_page(),
        Err(e) => {
            tracing::error!("Error loading page {}: {:?}", slug, e);
            return error_page();
        }
    };

    if let Err(e) = db::increment_views(pool, page.id).await {
        tracing::warn!("Failed to count view for {}: {:?}", page.slug, e);
    }
    state.metrics.record_page_view(&page.slug);

    let cache_key = keys::ssr_page(&slug, custom_domain.domain_name());
    if let Some(html) = state.cache.get::<String>(&cache_key).await {
        tracing::debug!("SSR cache hit for {}", cache_key);
        state.metrics.record_cache_hit(CACHE_KIND);
        return cached_html(html, true);
    }
    state.metrics.record_cache_miss(CACHE_KIND);

    let html = render_document(&page, &asset_base(&slug, custom_domain.0.as_ref()));
    if state.cache.set(&cache_key, &html, Some(SSR_TTL_SECS)).await {
        tracing::debug!("Stored rendered page {} in cache", cache_key);
    }

    cached_html(html, false)
}

/// `GET /`
pub async fn render_root(custom_domain: MaybeCustomDomain) -> Response {
    if custom_domain.0.as_ref().is_some_and(|domain| domain.is_root_domain) {
        return (
            StatusCode::FOUND,
            [(header::LOCATION, format!("/{ROOT_SLUG}"))],
        )
            .into_response();
    }

    (
        StatusCode::NOT_FOUND,
        Html(status_page(
            "Link AI",
            "Link AI Microservice",
            "Open a specific page through its slug.",
        )),
    )
        .into_response()
}
