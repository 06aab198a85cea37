/**
 * PWA Asset Handlers
 *
 * `GET /{slug}/manifest.json`, `GET /{slug}/sw.js` and
 * `GET /{slug}/offline.html`. Assets are cached for an hour under the same
 * custom-domain-aware keys the page update path invalidates. The cache is
 * checked before the page is loaded.
 */

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::manifest::build_manifest;
use super::offline::offline_page;
use super::service_worker::service_worker;
use crate::backend::cache::keys::{self, PwaAsset, PWA_TTL_SECS};
use crate::backend::middleware::MaybeCustomDomain;
use crate::backend::pages::AiPage;
use crate::backend::render::handlers::X_CACHE;
use crate::backend::render::resolve_page;
use crate::backend::server::state::AppState;

const CACHE_KIND: &str = "pwa";
const MANIFEST_CONTENT_TYPE: &str = "application/manifest+json";
const JAVASCRIPT_CONTENT_TYPE: &str = "application/javascript";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Outcome of loading the page behind an asset request
enum PwaPage {
    Enabled(AiPage),
    Disabled,
    Missing,
}

async fn load(state: &AppState, slug: &str, domain: &MaybeCustomDomain) -> Result<PwaPage, String> {
    let pool = state.db().map_err(|e| e.to_string())?;
    let page = resolve_page(pool, &state.metrics, slug, domain.0.as_ref())
        .await
        .map_err(|e| format!("{e:?}"))?;
    Ok(match page {
        Some(page) if page.pwa_enabled => PwaPage::Enabled(page),
        Some(_) => PwaPage::Disabled,
        None => PwaPage::Missing,
    })
}

fn with_headers(body: impl IntoResponse, content_type: &'static str, hit: Option<bool>) -> Response {
    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Some(hit) = hit {
        headers.insert(X_CACHE, HeaderValue::from_static(if hit { "HIT" } else { "MISS" }));
    }
    response
}

/// Cached asset body, recording the hit or miss
async fn cached<T: serde::de::DeserializeOwned>(state: &AppState, key: &str) -> Option<T> {
    let value = state.cache.get::<T>(key).await;
    if value.is_some() {
        state.metrics.record_cache_hit(CACHE_KIND);
    } else {
        state.metrics.record_cache_miss(CACHE_KIND);
    }
    value
}

async fn store<T: Serialize + ?Sized>(state: &AppState, key: &str, value: &T) {
    if state.cache.set(key, value, Some(PWA_TTL_SECS)).await {
        tracing::debug!("Stored PWA asset {} in cache", key);
    }
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// `GET /{slug}/manifest.json`
pub async fn manifest(
    State(state): State<AppState>,
    domain: MaybeCustomDomain,
    Path(slug): Path<String>,
) -> Response {
    let key = keys::pwa(PwaAsset::Manifest, &slug, domain.domain_name());
    if let Some(manifest) = cached::<serde_json::Value>(&state, &key).await {
        return with_headers(Json(manifest), MANIFEST_CONTENT_TYPE, Some(true));
    }

    let page = match load(&state, &slug, &domain).await {
        Ok(PwaPage::Enabled(page)) => page,
        Ok(PwaPage::Missing) => return json_error(StatusCode::NOT_FOUND, "Page not found"),
        Ok(PwaPage::Disabled) => {
            return json_error(StatusCode::NOT_FOUND, "PWA is not enabled for this page")
        }
        Err(e) => {
            tracing::error!("Error generating PWA manifest for {}: {}", slug, e);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let manifest = build_manifest(&page, &slug);
    store(&state, &key, &manifest).await;
    with_headers(Json(manifest), MANIFEST_CONTENT_TYPE, Some(false))
}

/// `GET /{slug}/sw.js`
pub async fn service_worker_script(
    State(state): State<AppState>,
    domain: MaybeCustomDomain,
    Path(slug): Path<String>,
) -> Response {
    let key = keys::pwa(PwaAsset::ServiceWorker, &slug, domain.domain_name());
    if let Some(script) = cached::<String>(&state, &key).await {
        return with_headers(script, JAVASCRIPT_CONTENT_TYPE, Some(true));
    }

    match load(&state, &slug, &domain).await {
        Ok(PwaPage::Enabled(_)) => {
            let script = service_worker(&slug);
            store(&state, &key, &script).await;
            with_headers(script, JAVASCRIPT_CONTENT_TYPE, Some(false))
        }
        Ok(_) => with_headers(
            (StatusCode::NOT_FOUND, "// PWA not enabled"),
            JAVASCRIPT_CONTENT_TYPE,
            None,
        ),
        Err(e) => {
            tracing::error!("Error generating service worker for {}: {}", slug, e);
            with_headers(
                (StatusCode::INTERNAL_SERVER_ERROR, "// Failed to generate service worker"),
                JAVASCRIPT_CONTENT_TYPE,
                None,
            )
        }
    }
}

/// `GET /{slug}/offline.html`
pub async fn offline(
    State(state): State<AppState>,
    domain: MaybeCustomDomain,
    Path(slug): Path<String>,
) -> Response {
    let key = keys::pwa(PwaAsset::Offline, &slug, domain.domain_name());
    if let Some(html) = cached::<String>(&state, &key).await {
        return with_headers(html, HTML_CONTENT_TYPE, Some(true));
    }

    match load(&state, &slug, &domain).await {
        Ok(PwaPage::Enabled(page)) => {
            let html = offline_page(&page);
            store(&state, &key, &html).await;
            with_headers(html, HTML_CONTENT_TYPE, Some(false))
        }
        Ok(_) => with_headers((StatusCode::NOT_FOUND, "PWA not enabled"), HTML_CONTENT_TYPE, None),
        Err(e) => {
            tracing::error!("Error generating offline page for {}: {}", slug, e);
            with_headers(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "<!DOCTYPE html><html><head><title>Offline error</title></head><body><h1>Failed to load the offline page</h1><p>Please try again later.</p></body></html>",
                ),
                HTML_CONTENT_TYPE,
                None,
            )
        }
    }
}
