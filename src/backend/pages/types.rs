/**
 * Page Types
 *
 * `AiPage` mirrors one row of `ai_pages`. Request bodies use the camelCase
 * field names the dashboard sends; responses keep the handful of
 * snake_case aliases (`html_content`, `created_at`, ...) older clients read.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::upstream::PageSyncPayload;

/// One generated page
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AiPage {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub html_content: String,
    pub prompt: Option<String>,

    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub page_title: Option<String>,
    pub page_description: Option<String>,
    pub keywords: Option<String>,
    pub favicon_url: Option<String>,
    pub canonical_url: Option<String>,
    pub robots: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,

    pub facebook_pixel: Option<String>,
    pub google_analytics: Option<String>,
    pub google_tag_manager: Option<String>,

    pub custom_head: Option<String>,
    pub custom_body: Option<String>,
    pub custom_footer: Option<String>,
    pub custom_css: Option<String>,
    pub thumbnail_url: Option<String>,

    pub pwa_enabled: bool,
    pub pwa_name: Option<String>,
    pub pwa_short_name: Option<String>,
    pub pwa_description: Option<String>,
    pub pwa_icon_url: Option<String>,
    pub pwa_theme_color: Option<String>,
    pub pwa_background_color: Option<String>,
    pub pwa_display_mode: Option<String>,
    pub pwa_start_url: Option<String>,
    pub pwa_scope: Option<String>,
    pub pwa_show_install_prompt: Option<bool>,

    pub custom_domain_id: Option<String>,
    pub views: i32,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AiPage {
    /// Body for `POST /api/ai-pages/sync` on the main backend
    pub fn sync_payload(&self) -> PageSyncPayload {
        PageSyncPayload {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            html_content: self.html_content.clone(),
            meta_title: self.meta_title.clone(),
            meta_description: self.meta_description.clone(),
            og_title: self.og_title.clone(),
            og_description: self.og_description.clone(),
            og_image: self.og_image.clone(),
            favicon_url: self.favicon_url.clone(),
            custom_css: self.custom_css.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            user_id: self.user_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Whether the install banner should be shown (absent means yes)
    pub fn shows_install_prompt(&self) -> bool {
        self.pwa_show_install_prompt.unwrap_or(true)
    }
}

/// Page as returned by the CRUD endpoints
#[derive(Debug, Serialize)]
pub struct PageResponse<'a> {
    #[serde(flatten)]
    pub page: &'a AiPage,
    pub html_content: &'a str,
    pub thumbnail_url: Option<&'a str>,
    pub favicon_url: Option<&'a str>,
    pub meta_title: Option<&'a str>,
    pub meta_description: Option<&'a str>,
    pub og_title: Option<&'a str>,
    pub og_description: Option<&'a str>,
    pub og_image: Option<&'a str>,
    pub custom_css: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a AiPage> for PageResponse<'a> {
    fn from(page: &'a AiPage) -> Self {
        Self {
            page,
            html_content: &page.html_content,
            thumbnail_url: page.thumbnail_url.as_deref(),
            favicon_url: page.favicon_url.as_deref(),
            meta_title: page.meta_title.as_deref(),
            meta_description: page.meta_description.as_deref(),
            og_title: page.og_title.as_deref(),
            og_description: page.og_description.as_deref(),
            og_image: page.og_image.as_deref(),
            custom_css: page.custom_css.as_deref(),
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

/// SEO, pixel and custom-code fields shared by create and update bodies
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFields {
    pub html_content: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub favicon_url: Option<String>,
    pub custom_css: Option<String>,
    pub page_title: Option<String>,
    pub page_description: Option<String>,
    pub keywords: Option<String>,
    pub canonical_url: Option<String>,
    pub robots: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    pub facebook_pixel: Option<String>,
    pub google_analytics: Option<String>,
    pub google_tag_manager: Option<String>,
    pub custom_head: Option<String>,
    pub custom_body: Option<String>,
    pub custom_footer: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// PWA settings; a field that is present in the body is applied as given
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PwaFields {
    pub pwa_enabled: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub pwa_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub pwa_short_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub pwa_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub pwa_icon_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub pwa_theme_color: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub pwa_background_color: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub pwa_display_mode: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub pwa_start_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub pwa_scope: Option<Option<String>>,
    pub pwa_show_install_prompt: Option<bool>,
}

impl PwaFields {
    /// Whether the body mentioned any PWA field at all
    pub fn any_present(&self) -> bool {
        self.pwa_enabled.is_some()
            || self.pwa_show_install_prompt.is_some()
            || [
                &self.pwa_name,
                &self.pwa_short_name,
                &self.pwa_description,
                &self.pwa_icon_url,
                &self.pwa_theme_color,
                &self.pwa_background_color,
                &self.pwa_display_mode,
                &self.pwa_start_url,
                &self.pwa_scope,
            ]
            .iter()
            .any(|field| field.is_some())
    }
}

/// Distinguishes `"field": null` (Some(None)) from a missing field (None)
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// `POST /api/ai-pages` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    #[serde(default)]
    pub title: String,
    pub prompt: Option<String>,
    pub slug: Option<String>,
    #[serde(default)]
    pub direct_creation: bool,
    #[serde(flatten)]
    pub fields: PageFields,
    #[serde(flatten)]
    pub pwa: PwaFields,
}

/// `PUT /api/ai-pages/{id}` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(flatten)]
    pub fields: PageFields,
    #[serde(flatten)]
    pub pwa: PwaFields,
    #[serde(default, deserialize_with = "present")]
    pub custom_domain_id: Option<Option<String>>,
}

/// Column values for a new row
#[derive(Debug, Clone, Default)]
pub struct NewPage {
    pub title: String,
    pub slug: String,
    pub html_content: String,
    pub prompt: Option<String>,
    pub fields: PageFields,
    pub pwa_enabled: bool,
    pub pwa: PwaFields,
    pub user_id: String,
}

/// `GET /api/public/{slug}` payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPageData {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub html_content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub custom_css: Option<String>,
    pub views: i32,
    pub created_at: DateTime<Utc>,
}

impl From<AiPage> for PublicPageData {
    fn from(page: AiPage) -> Self {
        Self {
            id: page.id,
            title: page.title,
            slug: page.slug,
            html_content: page.html_content,
            meta_title: page.meta_title,
            meta_description: page.meta_description,
            og_title: page.og_title,
            og_description: page.og_description,
            og_image: page.og_image,
            custom_css: page.custom_css,
            views: page.views,
            created_at: page.created_at,
        }
    }
}
