use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of page a view belongs to (Postgres enum `page_type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "page_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageType {
    #[default]
    AiPage,
    Biolink,
    Shortlink,
}

impl PageType {
    /// Parse a wire name (`AI_PAGE`, `BIOLINK`, `SHORTLINK`)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "AI_PAGE" => Some(Self::AiPage),
            "BIOLINK" => Some(Self::Biolink),
            "SHORTLINK" => Some(Self::Shortlink),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiPage => "AI_PAGE",
            Self::Biolink => "BIOLINK",
            Self::Shortlink => "SHORTLINK",
        }
    }
}

/// Largest value an `INTEGER` column accepts
pub const MAX_INT: i64 = i32::MAX as i64;
/// Largest value a `SMALLINT` column accepts
pub const MAX_SMALLINT: i64 = i16::MAX as i64;

/// One tracked visit as posted by the client script
///
/// Numbers are taken as `f64` and the page type as a string so that any
/// well-formed JSON reaches the handler, which does the validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub page_id: Option<String>,
    pub page_type: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub visitor_id: Option<String>,

    pub country: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub device: Option<String>,
    pub device_type: Option<String>,
    pub os: Option<String>,
    pub os_version: Option<String>,
    pub browser: Option<String>,
    pub browser_version: Option<String>,
    pub language: Option<String>,

    pub referrer: Option<String>,
    pub referrer_domain: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,

    pub screen_width: Option<f64>,
    pub screen_height: Option<f64>,
    pub viewport_width: Option<f64>,
    pub viewport_height: Option<f64>,
    pub color_depth: Option<f64>,
    pub pixel_ratio: Option<f64>,

    pub is_new_session: Option<bool>,
    pub is_new_visitor: Option<bool>,
    pub session_duration: Option<f64>,
    pub page_load_time: Option<f64>,
    pub previous_page: Option<String>,
    pub next_page: Option<String>,
    pub exit_page: Option<bool>,
    pub bounce: Option<bool>,

    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub is_bot: Option<bool>,
    pub is_mobile: Option<bool>,
    pub is_tablet: Option<bool>,
    pub is_desktop: Option<bool>,
}

/// Truncate a value to an integer bounded into `0..=max`
pub fn clamp_to(value: Option<f64>, max: i64) -> Option<i64> {
    value.map(|v| (v.trunc() as i64).clamp(0, max))
}

/// A validated visit with integer columns clamped to their ranges
#[derive(Debug, Clone)]
pub struct PageView {
    pub page_id: String,
    pub page_type: PageType,
    pub screen_width: Option<i64>,
    pub screen_height: Option<i64>,
    pub viewport_width: Option<i64>,
    pub viewport_height: Option<i64>,
    pub color_depth: Option<i64>,
    pub session_duration: Option<i64>,
    pub page_load_time: Option<i64>,
    pub request: TrackRequest,
}

/// Why a tracked visit was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackRejection {
    MissingFields,
    UnknownPageType,
}

impl TrackRejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingFields => "pageId and pageType are required",
            Self::UnknownPageType => "pageType must be AI_PAGE, BIOLINK or SHORTLINK",
        }
    }
}

impl TrackRequest {
    /// Check the required fields and clamp numbers to their column ranges
    pub fn into_view(self) -> Result<PageView, TrackRejection> {
        let page_id = self
            .page_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or(TrackRejection::MissingFields)?;
        let raw_type = self
            .page_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(TrackRejection::MissingFields)?;
        let page_type = PageType::parse(raw_type).ok_or(TrackRejection::UnknownPageType)?;

        Ok(PageView {
            page_id,
            page_type,
            screen_width: clamp_to(self.screen_width, MAX_SMALLINT),
            screen_height: clamp_to(self.screen_height, MAX_SMALLINT),
            viewport_width: clamp_to(self.viewport_width, MAX_SMALLINT),
            viewport_height: clamp_to(self.viewport_height, MAX_SMALLINT),
            color_depth: clamp_to(self.color_depth, MAX_SMALLINT),
            session_duration: clamp_to(self.session_duration, MAX_INT),
            page_load_time: clamp_to(self.page_load_time, MAX_INT),
            request: self,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_views: i64,
    pub unique_visitors: i64,
    pub unique_sessions: i64,
    pub avg_session_duration: i64,
    pub bounce_rate: i64,
}

/// A grouped count; serialized with the grouping column as its key
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Ranked {
    pub value: String,
    pub extra: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailyViews {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentView {
    pub id: Uuid,
    pub country: Option<String>,
    pub city: Option<String>,
    pub device: Option<String>,
    pub os: Option<String>,
    pub browser: Option<String>,
    pub referrer_domain: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    pub overview: Overview,
    pub top_countries: Vec<serde_json::Value>,
    pub top_cities: Vec<serde_json::Value>,
    pub top_devices: Vec<serde_json::Value>,
    #[serde(rename = "topOS")]
    pub top_os: Vec<serde_json::Value>,
    pub top_browsers: Vec<serde_json::Value>,
    pub top_referrers: Vec<serde_json::Value>,
    pub top_languages: Vec<serde_json::Value>,
    #[serde(rename = "topUTMSources")]
    pub top_utm_sources: Vec<serde_json::Value>,
    pub daily_views: Vec<DailyViews>,
    pub recent_views: Vec<RecentView>,
}

/// `GET /api/analytics/stats/{pageId}` query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub page_type: Option<PageType>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}
