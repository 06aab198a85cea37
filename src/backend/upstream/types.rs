use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A custom domain resolved by the main backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDomain {
    pub domain: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub is_root_domain: bool,
    pub page_id: String,
    #[serde(default)]
    pub status: String,
}

impl CustomDomain {
    /// The page id as a UUID, when it is one
    pub fn page_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.page_id).ok()
    }
}

/// `POST /api/domains/lookup` response body
#[derive(Debug, Deserialize)]
pub(crate) struct DomainLookupResponse {
    #[serde(default)]
    pub domain: Option<CustomDomain>,
}

/// Body of `POST /api/ai-pages/sync`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSyncPayload {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub html_content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub favicon_url: Option<String>,
    pub custom_css: Option<String>,
    pub thumbnail_url: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
