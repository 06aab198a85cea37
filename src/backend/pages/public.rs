//! `GET /api/public/{slug}` - page data for embedding clients

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::db;
use super::types::PublicPageData;
use crate::backend::db::{with_retry, RetryPolicy};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct PublicPageResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: PublicPageData,
}

pub async fn get_public_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicPageResponse>, BackendError> {
    let pool = state.db()?;
    let page = with_retry(&state.metrics, RetryPolicy::default(), || db::find_by_slug(pool, &slug))
        .await?
        .ok_or_else(|| BackendError::not_found("Page not found"))?;

    if let Err(e) = db::increment_views(pool, page.id).await {
        tracing::warn!("Failed to count view for {}: {:?}", page.slug, e);
    }
    state.metrics.record_page_view(&page.slug);

    Ok(Json(PublicPageResponse {
        kind: "ai-page",
        data: page.into(),
    }))
}
