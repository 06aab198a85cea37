//! Metrics HTTP Handlers
//!
//! - `GET /metrics` - Prometheus text exposition
//! - `GET /metrics/cache` - Redis connection and key count
//! - `GET /metrics/database` - Page, view and user totals
//! - `POST /metrics/cache/clear` - Delete by pattern, or flush everything

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::auth::users::count_users;
use crate::backend::cache::CacheStats;
use crate::backend::error::BackendError;
use crate::backend::pages::db::{self as pages_db, RecentPage};
use crate::backend::server::state::AppState;

/// Prometheus text format content type
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const RECENT_PAGES: i64 = 5;

pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.export_prometheus(),
    )
}

pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStats {
    pub total_pages: i64,
    pub total_views: i64,
    pub total_users: i64,
    pub recent_pages: Vec<RecentPage>,
}

pub async fn database_stats(State(state): State<AppState>) -> Result<Json<DatabaseStats>, BackendError> {
    let pool = state.db()?;
    Ok(Json(DatabaseStats {
        total_pages: pages_db::count_pages(pool).await?,
        total_views: pages_db::total_views(pool).await?,
        total_users: count_users(pool).await?,
        recent_pages: pages_db::recent_pages(pool, RECENT_PAGES).await?,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearCacheRequest {
    pub pattern: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCacheResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_keys: Option<u64>,
}

pub async fn clear_cache(
    State(state): State<AppState>,
    body: Option<Json<ClearCacheRequest>>,
) -> Json<ClearCacheResponse> {
    let pattern = body
        .and_then(|Json(body)| body.pattern)
        .filter(|p| !p.is_empty());

    match pattern {
        Some(pattern) => {
            let deleted = state.cache.del_pattern(&pattern).await;
            Json(ClearCacheResponse {
                message: "Cache cleared".to_string(),
                deleted_keys: Some(deleted),
            })
        }
        None => {
            state.cache.flush_all().await;
            Json(ClearCacheResponse {
                message: "All cache entries were cleared".to_string(),
                deleted_keys: None,
            })
        }
    }
}
