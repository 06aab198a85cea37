/**
 * API Routes
 *
 * JSON endpoints under `/api` plus the Prometheus/metrics endpoints.
 *
 * # Routes
 *
 * ## Pages (JWT + user sync)
 * - `GET    /api/ai-pages`        - List pages (admins see all)
 * - `POST   /api/ai-pages`        - Create a page (AI or direct)
 * - `POST   /api/ai-pages/stream` - Generate or edit a page over SSE
 * - `GET    /api/ai-pages/{id}`   - Get an owned page
 * - `PUT    /api/ai-pages/{id}`   - Update an owned page
 * - `DELETE /api/ai-pages/{id}`   - Delete an owned page
 *
 * ## Public
 * - `GET  /api/public/{slug}`          - Page data for embedding
 * - `POST /api/analytics/track`        - Analytics beacon
 * - `GET  /api/analytics/stats/{id}`   - Page statistics (JWT)
 * - `POST /api/clear-cache`            - Drop every rendered page
 *
 * ## Metrics
 * - `GET  /metrics`             - Prometheus exposition
 * - `GET  /metrics/cache`       - Redis statistics
 * - `GET  /metrics/database`    - Page/view/user totals
 * - `POST /metrics/cache/clear` - Delete keys by pattern (admin)
 */

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::backend::analytics::handlers::{page_stats, track_view};
use crate::backend::cache::keys::SSR_PATTERN;
use crate::backend::generation::stream::stream_page;
use crate::backend::metrics::handlers::{cache_stats, clear_cache, database_stats, prometheus_metrics};
use crate::backend::middleware::{auth_middleware, ensure_user_exists, require_admin};
use crate::backend::pages::handlers::{create_page, delete_page, get_page, list_pages, update_page};
use crate::backend::pages::public::get_public_page;
use crate::backend::server::state::AppState;

/// `/api/ai-pages` routes, all behind authentication and user sync
fn page_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/ai-pages", get(list_pages).post(create_page))
        .route("/api/ai-pages/stream", post(stream_page))
        .route(
            "/api/ai-pages/{id}",
            get(get_page).put(update_page).delete(delete_page),
        )
        // Layers run bottom-up: authenticate first, then sync the user
        .route_layer(middleware::from_fn_with_state(state.clone(), ensure_user_exists))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

fn analytics_routes(state: &AppState) -> Router<AppState> {
    let stats = Router::new()
        .route("/api/analytics/stats/{page_id}", get(page_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/api/analytics/track", post(track_view))
        .merge(stats)
}

fn metrics_routes(state: &AppState) -> Router<AppState> {
    let clear = Router::new()
        .route("/metrics/cache/clear", post(clear_cache))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/metrics", get(prometheus_metrics))
        .route("/metrics/cache", get(cache_stats))
        .route("/metrics/database", get(database_stats))
        .merge(clear)
}

/// `POST /api/clear-cache`
pub async fn clear_rendered_pages(State(state): State<AppState>) -> Json<Value> {
    let deleted = state.cache.del_pattern(SSR_PATTERN).await;
    Json(json!({
        "success": true,
        "message": format!("Cache cleared: {deleted} keys removed"),
    }))
}

/// Configure every JSON endpoint on `router`
pub fn configure_api_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .merge(page_routes(state))
        .merge(analytics_routes(state))
        .merge(metrics_routes(state))
        .route("/api/public/{slug}", get(get_public_page))
        .route("/api/clear-cache", post(clear_rendered_pages))
}
