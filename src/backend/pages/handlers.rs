/**
 * Page CRUD Handlers
 *
 * `/api/ai-pages` endpoints. Every route runs behind `auth_middleware` and
 * `ensure_user_exists`, so the caller is always an authenticated user with
 * a local row.
 *
 * # Endpoints
 *
 * - `GET /api/ai-pages` - List pages (admins see every page)
 * - `GET /api/ai-pages/{id}` - One owned page
 * - `POST /api/ai-pages` - Create with AI, or store directly (`directCreation`)
 * - `PUT /api/ai-pages/{id}` - Update fields and invalidate cached renders
 * - `DELETE /api/ai-pages/{id}` - Delete an owned page
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::db;
use super::slug::generate_slug;
use super::types::{AiPage, CreatePageRequest, NewPage, PageResponse, UpdatePageRequest};
use crate::backend::cache::keys;
use crate::backend::credits::{self, CreditAction};
use crate::backend::error::BackendError;
use crate::backend::generation::resolve_generator;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::SharedError;

const INSUFFICIENT_CREATE_MESSAGE: &str =
    "You do not have enough credits to create a new page. Consider purchasing a plan or a credit pack.";

fn parse_id(id: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(id).map_err(|_| BackendError::not_found("Page not found"))
}

async fn owned_page(state: &AppState, id: &str, user_id: &str) -> Result<AiPage, BackendError> {
    let id = parse_id(id)?;
    db::find_owned(state.db()?, id, user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Page not found"))
}

pub async fn list_pages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, BackendError> {
    let owner = (!user.is_admin()).then_some(user.user_id.as_str());
    let pages = db::list_pages(state.db()?, owner).await?;
    info!("Listing {} pages for {} ({})", pages.len(), user.user_id, user.role.as_str());

    let body: Vec<PageResponse> = pages.iter().map(PageResponse::from).collect();
    Ok(Json(serde_json::to_value(body)?))
}

pub async fn get_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BackendError> {
    let page = owned_page(&state, &id, &user.user_id).await?;
    Ok(Json(serde_json::to_value(PageResponse::from(&page))?))
}

pub async fn create_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreatePageRequest>,
) -> Result<impl IntoResponse, BackendError> {
    if body.title.trim().is_empty() {
        return Err(SharedError::validation("title", "Title is required").into());
    }
    let pool = state.db()?;
    let charged = !body.direct_creation;

    if charged {
        let cost = CreditAction::PageCreation.cost();
        let main_db = state.main_db()?;
        if !credits::has_credits(main_db, &user.user_id, cost).await {
            return Err(BackendError::insufficient_credits(cost, INSUFFICIENT_CREATE_MESSAGE));
        }
    }

    let base_slug = match body.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => generate_slug(&body.title),
    };
    let slug = db::unique_slug(pool, &base_slug).await?;

    let new_page = if body.direct_creation {
        info!("Direct creation of page {} for {}", slug, user.user_id);
        let mut fields = body.fields.clone();
        let html_content = fields.html_content.take().unwrap_or_default();
        if fields.robots.as_deref().map_or(true, str::is_empty) {
            fields.robots = Some("index,follow".to_string());
        }
        NewPage {
            title: body.title.clone(),
            slug,
            html_content,
            prompt: body.prompt.clone(),
            fields,
            pwa_enabled: body.pwa.pwa_enabled.unwrap_or(false),
            pwa: body.pwa.clone(),
            user_id: user.user_id.clone(),
        }
    } else {
        info!("Generating page {} with AI for {}", slug, user.user_id);
        let generator = resolve_generator(&state).await?;
        let prompt = body.prompt.clone().unwrap_or_default();
        let generated = generator.create_page(&body.title, &prompt).await?;

        let mut new_page = NewPage {
            title: body.title.clone(),
            slug,
            html_content: generated.html_content,
            prompt: body.prompt.clone(),
            user_id: user.user_id.clone(),
            ..Default::default()
        };
        new_page.fields.meta_title = Some(generated.meta_title);
        new_page.fields.meta_description = Some(generated.meta_description);
        new_page.fields.og_title = Some(generated.og_title);
        new_page.fields.og_description = Some(generated.og_description);
        new_page
    };

    let page = db::insert_page(pool, &new_page).await?;
    state.metrics.record_page_created();

    if charged {
        if let Ok(main_db) = state.main_db() {
            let reference = page.id.to_string();
            credits::consume_credits(
                main_db,
                &user.user_id,
                CreditAction::PageCreation.cost(),
                CreditAction::PageCreation,
                &format!("Page creation: {}", page.title),
                Some(&reference),
            )
            .await;
        }
    }

    state.upstream.sync_page_logged(&page.sync_payload()).await;

    info!("Created page {} ({})", page.slug, page.id);
    Ok((StatusCode::CREATED, Json(serde_json::to_value(PageResponse::from(&page))?)))
}

/// Apply an update body to a page
///
/// Text fields are only applied when non-empty. PWA fields and the custom
/// domain are applied whenever the body mentions them, so they can be
/// cleared with `null`.
pub fn apply_update(page: &mut AiPage, update: &UpdatePageRequest) {
    fn set(target: &mut Option<String>, value: &Option<String>) {
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            *target = Some(v.to_string());
        }
    }
    fn set_present(target: &mut Option<String>, value: &Option<Option<String>>) {
        if let Some(v) = value {
            *target = v.clone();
        }
    }

    if let Some(title) = update.title.as_deref().filter(|t| !t.is_empty()) {
        page.title = title.to_string();
    }
    if let Some(slug) = update.slug.as_deref().filter(|s| !s.is_empty()) {
        page.slug = slug.to_string();
    }

    let f = &update.fields;
    if let Some(html) = f.html_content.as_deref().filter(|h| !h.is_empty()) {
        page.html_content = html.to_string();
    }
    set(&mut page.favicon_url, &f.favicon_url);
    set(&mut page.meta_title, &f.meta_title);
    set(&mut page.meta_description, &f.meta_description);
    set(&mut page.og_title, &f.og_title);
    set(&mut page.og_description, &f.og_description);
    set(&mut page.og_image, &f.og_image);
    set(&mut page.custom_css, &f.custom_css);
    set(&mut page.page_title, &f.page_title);
    set(&mut page.page_description, &f.page_description);
    set(&mut page.keywords, &f.keywords);
    set(&mut page.canonical_url, &f.canonical_url);
    set(&mut page.robots, &f.robots);
    set(&mut page.twitter_title, &f.twitter_title);
    set(&mut page.twitter_description, &f.twitter_description);
    set(&mut page.twitter_image, &f.twitter_image);
    set(&mut page.facebook_pixel, &f.facebook_pixel);
    set(&mut page.google_analytics, &f.google_analytics);
    set(&mut page.google_tag_manager, &f.google_tag_manager);
    set(&mut page.custom_head, &f.custom_head);
    set(&mut page.custom_body, &f.custom_body);
    set(&mut page.custom_footer, &f.custom_footer);
    set(&mut page.thumbnail_url, &f.thumbnail_url);

    let pwa = &update.pwa;
    if let Some(enabled) = pwa.pwa_enabled {
        page.pwa_enabled = enabled;
    }
    set_present(&mut page.pwa_name, &pwa.pwa_name);
    set_present(&mut page.pwa_short_name, &pwa.pwa_short_name);
    set_present(&mut page.pwa_description, &pwa.pwa_description);
    set_present(&mut page.pwa_icon_url, &pwa.pwa_icon_url);
    set_present(&mut page.pwa_theme_color, &pwa.pwa_theme_color);
    set_present(&mut page.pwa_background_color, &pwa.pwa_background_color);
    set_present(&mut page.pwa_display_mode, &pwa.pwa_display_mode);
    set_present(&mut page.pwa_start_url, &pwa.pwa_start_url);
    set_present(&mut page.pwa_scope, &pwa.pwa_scope);
    if let Some(show) = pwa.pwa_show_install_prompt {
        page.pwa_show_install_prompt = Some(show);
    }
    set_present(&mut page.custom_domain_id, &update.custom_domain_id);
}

pub async fn update_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdatePageRequest>,
) -> Result<impl IntoResponse, BackendError> {
    let pool = state.db()?;
    let existing = owned_page(&state, &id, &user.user_id).await?;

    let new_slug = body.slug.as_deref().filter(|s| !s.is_empty() && *s != existing.slug);
    if let Some(slug) = new_slug {
        if db::slug_exists(pool, slug).await? {
            return Err(BackendError::bad_request("This slug already exists"));
        }
    }

    let mut page = existing.clone();
    apply_update(&mut page, &body);
    let updated = db::save_page(pool, &page).await?;

    let old_slug = new_slug.map(|_| existing.slug.as_str());
    let stale = keys::page_invalidation(&updated.slug, old_slug, body.pwa.any_present());
    let removed = state.cache.del_many(&stale).await;
    info!("Updated page {}; invalidated {} cached entries", updated.slug, removed);

    Ok(Json(serde_json::to_value(PageResponse::from(&updated))?))
}

pub async fn delete_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BackendError> {
    let page = owned_page(&state, &id, &user.user_id).await?;

    if !db::delete_page(state.db()?, page.id).await? {
        warn!("Page {} vanished before delete", page.id);
    }
    state
        .cache
        .del_many(&keys::page_invalidation(&page.slug, None, page.pwa_enabled))
        .await;

    Ok(Json(serde_json::json!({ "message": "Page deleted successfully" })))
}
