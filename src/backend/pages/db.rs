//! Database operations for `ai_pages`

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::slug::numbered;
use super::types::{AiPage, NewPage};

pub(crate) const PAGE_COLUMNS: &str = "id, title, slug, html_content, prompt, \
     meta_title, meta_description, og_title, og_description, og_image, \
     page_title, page_description, keywords, favicon_url, canonical_url, robots, \
     twitter_title, twitter_description, twitter_image, \
     facebook_pixel, google_analytics, google_tag_manager, \
     custom_head, custom_body, custom_footer, custom_css, thumbnail_url, \
     pwa_enabled, pwa_name, pwa_short_name, pwa_description, pwa_icon_url, \
     pwa_theme_color, pwa_background_color, pwa_display_mode, pwa_start_url, pwa_scope, \
     pwa_show_install_prompt, custom_domain_id, views, user_id, created_at, updated_at";

/// Summary row for `GET /metrics/database`
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentPage {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub views: i32,
    pub created_at: chrono::DateTime<Utc>,
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<AiPage>, sqlx::Error> {
    sqlx::query_as::<_, AiPage>(&format!("SELECT {PAGE_COLUMNS} FROM ai_pages WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<AiPage>, sqlx::Error> {
    sqlx::query_as::<_, AiPage>(&format!("SELECT {PAGE_COLUMNS} FROM ai_pages WHERE slug = $1"))
        .bind(slug)
        .fetch_optional(pool)
        .await
}

/// A page, only when `user_id` owns it
pub async fn find_owned(pool: &PgPool, id: Uuid, user_id: &str) -> Result<Option<AiPage>, sqlx::Error> {
    sqlx::query_as::<_, AiPage>(&format!(
        "SELECT {PAGE_COLUMNS} FROM ai_pages WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Pages newest first; every page when `user_id` is `None`
pub async fn list_pages(pool: &PgPool, user_id: Option<&str>) -> Result<Vec<AiPage>, sqlx::Error> {
    sqlx::query_as::<_, AiPage>(&format!(
        "SELECT {PAGE_COLUMNS} FROM ai_pages WHERE ($1::text IS NULL OR user_id = $1) ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM ai_pages WHERE slug = $1)")
        .bind(slug)
        .fetch_one(pool)
        .await
}

/// First free slug among `base`, `base-1`, `base-2`, ...
pub async fn unique_slug(pool: &PgPool, base: &str) -> Result<String, sqlx::Error> {
    let mut candidate = base.to_string();
    let mut counter = 1;
    while slug_exists(pool, &candidate).await? {
        candidate = numbered(base, counter);
        counter += 1;
    }
    Ok(candidate)
}

pub async fn insert_page(pool: &PgPool, page: &NewPage) -> Result<AiPage, sqlx::Error> {
    let now = Utc::now();
    let f = &page.fields;
    let pwa = &page.pwa;
    let flat = |field: &Option<Option<String>>| field.clone().flatten();

    sqlx::query_as::<_, AiPage>(&format!(
        r#"
        INSERT INTO ai_pages (
            id, title, slug, html_content, prompt,
            meta_title, meta_description, og_title, og_description, og_image,
            page_title, page_description, keywords, favicon_url, canonical_url, robots,
            twitter_title, twitter_description, twitter_image,
            facebook_pixel, google_analytics, google_tag_manager,
            custom_head, custom_body, custom_footer, custom_css, thumbnail_url,
            pwa_enabled, pwa_name, pwa_short_name, pwa_description, pwa_icon_url,
            pwa_theme_color, pwa_background_color, pwa_display_mode, pwa_start_url, pwa_scope,
            pwa_show_install_prompt, views, user_id, created_at, updated_at
        )
        VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
            $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30,
            $31, $32, $33, $34, $35, $36, $37, $38, 0, $39, $40, $40
        )
        RETURNING {PAGE_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&page.title)
    .bind(&page.slug)
    .bind(&page.html_content)
    .bind(&page.prompt)
    .bind(&f.meta_title)
    .bind(&f.meta_description)
    .bind(&f.og_title)
    .bind(&f.og_description)
    .bind(&f.og_image)
    .bind(&f.page_title)
    .bind(&f.page_description)
    .bind(&f.keywords)
    .bind(&f.favicon_url)
    .bind(&f.canonical_url)
    .bind(&f.robots)
    .bind(&f.twitter_title)
    .bind(&f.twitter_description)
    .bind(&f.twitter_image)
    .bind(&f.facebook_pixel)
    .bind(&f.google_analytics)
    .bind(&f.google_tag_manager)
    .bind(&f.custom_head)
    .bind(&f.custom_body)
    .bind(&f.custom_footer)
    .bind(&f.custom_css)
    .bind(&f.thumbnail_url)
    .bind(page.pwa_enabled)
    .bind(flat(&pwa.pwa_name))
    .bind(flat(&pwa.pwa_short_name))
    .bind(flat(&pwa.pwa_description))
    .bind(flat(&pwa.pwa_icon_url))
    .bind(flat(&pwa.pwa_theme_color))
    .bind(flat(&pwa.pwa_background_color))
    .bind(flat(&pwa.pwa_display_mode))
    .bind(flat(&pwa.pwa_start_url))
    .bind(flat(&pwa.pwa_scope))
    .bind(pwa.pwa_show_install_prompt)
    .bind(&page.user_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Write every mutable column of `page` back and refresh `updated_at`
pub async fn save_page(pool: &PgPool, page: &AiPage) -> Result<AiPage, sqlx::Error> {
    sqlx::query_as::<_, AiPage>(&format!(
        r#"
        UPDATE ai_pages SET
            title = $2, slug = $3, html_content = $4, prompt = $5,
            meta_title = $6, meta_description = $7, og_title = $8, og_description = $9, og_image = $10,
            page_title = $11, page_description = $12, keywords = $13, favicon_url = $14,
            canonical_url = $15, robots = $16,
            twitter_title = $17, twitter_description = $18, twitter_image = $19,
            facebook_pixel = $20, google_analytics = $21, google_tag_manager = $22,
            custom_head = $23, custom_body = $24, custom_footer = $25, custom_css = $26,
            thumbnail_url = $27,
            pwa_enabled = $28, pwa_name = $29, pwa_short_name = $30, pwa_description = $31,
            pwa_icon_url = $32, pwa_theme_color = $33, pwa_background_color = $34,
            pwa_display_mode = $35, pwa_start_url = $36, pwa_scope = $37,
            pwa_show_install_prompt = $38, custom_domain_id = $39,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {PAGE_COLUMNS}
        "#
    ))
    .bind(page.id)
    .bind(&page.title)
    .bind(&page.slug)
    .bind(&page.html_content)
    .bind(&page.prompt)
    .bind(&page.meta_title)
    .bind(&page.meta_description)
    .bind(&page.og_title)
    .bind(&page.og_description)
    .bind(&page.og_image)
    .bind(&page.page_title)
    .bind(&page.page_description)
    .bind(&page.keywords)
    .bind(&page.favicon_url)
    .bind(&page.canonical_url)
    .bind(&page.robots)
    .bind(&page.twitter_title)
    .bind(&page.twitter_description)
    .bind(&page.twitter_image)
    .bind(&page.facebook_pixel)
    .bind(&page.google_analytics)
    .bind(&page.google_tag_manager)
    .bind(&page.custom_head)
    .bind(&page.custom_body)
    .bind(&page.custom_footer)
    .bind(&page.custom_css)
    .bind(&page.thumbnail_url)
    .bind(page.pwa_enabled)
    .bind(&page.pwa_name)
    .bind(&page.pwa_short_name)
    .bind(&page.pwa_description)
    .bind(&page.pwa_icon_url)
    .bind(&page.pwa_theme_color)
    .bind(&page.pwa_background_color)
    .bind(&page.pwa_display_mode)
    .bind(&page.pwa_start_url)
    .bind(&page.pwa_scope)
    .bind(page.pwa_show_install_prompt)
    .bind(&page.custom_domain_id)
    .fetch_one(pool)
    .await
}

pub async fn delete_page(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ai_pages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn increment_views(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE ai_pages SET views = views + 1 WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count_pages(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM ai_pages")
        .fetch_one(pool)
        .await
}

pub async fn count_user_pages(pool: &PgPool, user_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM ai_pages WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub async fn total_views(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COALESCE(SUM(views), 0)::bigint FROM ai_pages")
        .fetch_one(pool)
        .await
}

pub async fn recent_pages(pool: &PgPool, limit: i64) -> Result<Vec<RecentPage>, sqlx::Error> {
    sqlx::query_as::<_, RecentPage>(
        "SELECT id, title, slug, views, created_at FROM ai_pages ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
