/**
 * Router Configuration
 *
 * Combines every route group into one Axum router and applies the
 * cross-cutting layers.
 *
 * # Route Order
 *
 * 1. `GET /health`
 * 2. API and metrics routes (static paths win over `/{slug}`)
 * 3. Site routes (SSR pages, PWA assets)
 * 4. Fallback: 404 JSON with the requested path
 *
 * # Layers (outermost first)
 *
 * Tracing, CORS, security headers, custom-domain resolution, request
 * metrics, body limit.
 */

use axum::{
    extract::{DefaultBodyLimit, OriginalUri},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::backend::middleware::{custom_domain_middleware, track_metrics};
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::site_routes::configure_site_routes;
use crate::backend::server::state::AppState;

/// Name reported by `/health`
pub const SERVICE_NAME: &str = "link-ai-microservice";

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// 404 for anything no route matched
pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "path": uri.to_string(),
        })),
    )
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

/// Content-Security-Policy allowing CDN scripts and framing by the dashboards
pub fn content_security_policy(allowed_origins: &[String]) -> String {
    let ancestors = std::iter::once("'self'")
        .chain(allowed_origins.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "default-src 'self'; \
         script-src 'self' 'unsafe-inline' 'unsafe-eval' https: http:; \
         style-src 'self' 'unsafe-inline' https: http:; \
         img-src 'self' data: blob: https: http:; \
         connect-src 'self' https: http: wss: ws:; \
         font-src 'self' data: https: http:; \
         media-src 'self' data: blob: https: http:; \
         frame-src 'self' https: http: data: blob:; \
         worker-src 'self' blob:; \
         frame-ancestors {ancestors}"
    )
}

/// Create the Axum router with all routes and layers configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let config = app_state.config.clone();

    let router = Router::new().route("/health", get(health));
    let router = configure_api_routes(router, &app_state);
    let router = configure_site_routes(router).fallback(not_found);

    let csp = HeaderValue::from_str(&content_security_policy(&config.allowed_origins))
        .unwrap_or_else(|_| HeaderValue::from_static("default-src 'self'"));

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.allowed_origins))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CONTENT_SECURITY_POLICY,
                    csp,
                ))
                .layer(middleware::from_fn_with_state(
                    app_state.clone(),
                    custom_domain_middleware,
                ))
                .layer(middleware::from_fn_with_state(app_state.clone(), track_metrics)),
        )
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_lists_allowed_origins() {
        let csp = content_security_policy(&["http://localhost:8080".to_string()]);
        assert!(csp.ends_with("frame-ancestors 'self' http://localhost:8080"));
        assert!(HeaderValue::from_str(&csp).is_ok());
    }
}
