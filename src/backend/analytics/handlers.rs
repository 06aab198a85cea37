//! Analytics HTTP Handlers
//!
//! - `POST /api/analytics/track` - public beacon endpoint
//! - `GET /api/analytics/stats/{pageId}` - aggregated stats (JWT)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::db;
use super::types::{PageStats, StatsQuery, TrackRequest};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

pub async fn track_view(
    State(state): State<AppState>,
    Json(body): Json<TrackRequest>,
) -> Result<Json<Value>, BackendError> {
    let view = body
        .into_view()
        .map_err(|rejection| BackendError::bad_request(rejection.message()))?;
    debug!("Tracking view of {} ({})", view.page_id, view.page_type.as_str());

    match state.db_pool.as_ref() {
        Some(pool) => {
            if let Err(e) = db::insert_view(pool, &view).await {
                error!("Failed to store page view: {:?}", e);
            }
        }
        None => warn!("Page view dropped: database is not configured"),
    }

    Ok(Json(json!({ "success": true })))
}

pub async fn page_stats(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(page_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, BackendError> {
    let pool = state.db()?;
    let page_type = query.page_type.unwrap_or_default();

    let stats = match db::page_stats(pool, &page_id, page_type, query.date_from, query.date_to).await {
        Ok(stats) => stats,
        Err(e) => {
            error!("Failed to load stats for {}: {:?}", page_id, e);
            PageStats::default()
        }
    };

    Ok(Json(json!({ "stats": stats })))
}
