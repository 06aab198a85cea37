//! Database operations for `page_views`

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::types::{DailyViews, Overview, PageStats, PageType, PageView, Ranked, RecentView};

/// Rows returned for each top-N list
const TOP_LIMIT: i64 = 10;
/// Rows returned for the recent-views list
const RECENT_LIMIT: i64 = 100;

/// Grouping for a top-N list: SQL column and the JSON key it is reported under
struct Dimension {
    column: &'static str,
    key: &'static str,
}

const COUNTRY: Dimension = Dimension { column: "country", key: "country" };
const DEVICE: Dimension = Dimension { column: "device", key: "device" };
const OS: Dimension = Dimension { column: "os", key: "os" };
const BROWSER: Dimension = Dimension { column: "browser", key: "browser" };
const REFERRER: Dimension = Dimension { column: "referrer_domain", key: "referrerDomain" };
const LANGUAGE: Dimension = Dimension { column: "language", key: "language" };
const UTM_SOURCE: Dimension = Dimension { column: "utm_source", key: "utmSource" };

/// Shared filter: page, type and optional date range ($1..$4)
const FILTER: &str = "page_id = $1 AND page_type = $2 \
     AND ($3::timestamptz IS NULL OR created_at >= $3) \
     AND ($4::timestamptz IS NULL OR created_at <= $4)";

struct Scope<'a> {
    page_id: &'a str,
    page_type: PageType,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

pub async fn insert_view(pool: &PgPool, view: &PageView) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO page_views (
            id, page_id, page_type, user_id, session_id, visitor_id,
            country, country_code, region, city, timezone, latitude, longitude,
            device, device_type, os, os_version, browser, browser_version, language,
            referrer, referrer_domain, utm_source, utm_medium, utm_campaign, utm_term, utm_content,
            screen_width, screen_height, viewport_width, viewport_height, color_depth, pixel_ratio,
            is_new_session, is_new_visitor, session_duration, page_load_time, previous_page, next_page,
            exit_page, bounce, user_agent, ip_address, is_bot, is_mobile, is_tablet, is_desktop,
            created_at
        ) VALUES (
            gen_random_uuid(), $1, $2, $3, $4, $5,
            $6, $7, $8, $9, $10, $11, $12,
            $13, $14, $15, $16, $17, $18, $19,
            $20, $21, $22, $23, $24, $25, $26,
            $27::smallint, $28::smallint, $29::smallint, $30::smallint, $31::smallint, $32,
            $33, $34, $35::int, $36::int, $37, $38,
            $39, $40, $41, $42, $43, $44, $45, $46,
            NOW()
        )
        "#,
    )
    .bind(&view.page_id)
    .bind(view.page_type)
    .bind(&view.request.user_id)
    .bind(&view.request.session_id)
    .bind(&view.request.visitor_id)
    .bind(&view.request.country)
    .bind(&view.request.country_code)
    .bind(&view.request.region)
    .bind(&view.request.city)
    .bind(&view.request.timezone)
    .bind(view.request.latitude)
    .bind(view.request.longitude)
    .bind(&view.request.device)
    .bind(&view.request.device_type)
    .bind(&view.request.os)
    .bind(&view.request.os_version)
    .bind(&view.request.browser)
    .bind(&view.request.browser_version)
    .bind(&view.request.language)
    .bind(&view.request.referrer)
    .bind(&view.request.referrer_domain)
    .bind(&view.request.utm_source)
    .bind(&view.request.utm_medium)
    .bind(&view.request.utm_campaign)
    .bind(&view.request.utm_term)
    .bind(&view.request.utm_content)
    .bind(view.screen_width)
    .bind(view.screen_height)
    .bind(view.viewport_width)
    .bind(view.viewport_height)
    .bind(view.color_depth)
    .bind(view.request.pixel_ratio)
    .bind(view.request.is_new_session.unwrap_or(true))
    .bind(view.request.is_new_visitor.unwrap_or(true))
    .bind(view.session_duration)
    .bind(view.page_load_time)
    .bind(&view.request.previous_page)
    .bind(&view.request.next_page)
    .bind(view.request.exit_page.unwrap_or(false))
    .bind(view.request.bounce.unwrap_or(false))
    .bind(&view.request.user_agent)
    .bind(&view.request.ip_address)
    .bind(view.request.is_bot.unwrap_or(false))
    .bind(view.request.is_mobile.unwrap_or(false))
    .bind(view.request.is_tablet.unwrap_or(false))
    .bind(view.request.is_desktop.unwrap_or(false))
    .execute(pool)
    .await?;
    Ok(())
}

async fn overview(pool: &PgPool, scope: &Scope<'_>) -> Result<Overview, sqlx::Error> {
    sqlx::query_as::<_, Overview>(&format!(
        r#"
        SELECT
            COUNT(*)::bigint AS total_views,
            COUNT(DISTINCT visitor_id)::bigint AS unique_visitors,
            COUNT(DISTINCT session_id)::bigint AS unique_sessions,
            COALESCE(AVG(CASE WHEN session_duration > 0 THEN session_duration END), 0)::bigint AS avg_session_duration,
            COALESCE(COUNT(CASE WHEN bounce THEN 1 END)::float8 / NULLIF(COUNT(*)::float8, 0) * 100, 0)::bigint AS bounce_rate
        FROM page_views
        WHERE {FILTER}
        "#
    ))
    .bind(scope.page_id)
    .bind(scope.page_type)
    .bind(scope.from)
    .bind(scope.to)
    .fetch_one(pool)
    .await
}

async fn top(pool: &PgPool, scope: &Scope<'_>, dim: &Dimension) -> Result<Vec<serde_json::Value>, sqlx::Error> {
    let col = dim.column;
    let rows = sqlx::query_as::<_, Ranked>(&format!(
        "SELECT {col} AS value, NULL::text AS extra, COUNT(*)::bigint AS count \
         FROM page_views WHERE {FILTER} AND {col} IS NOT NULL \
         GROUP BY {col} ORDER BY count DESC LIMIT {TOP_LIMIT}"
    ))
    .bind(scope.page_id)
    .bind(scope.page_type)
    .bind(scope.from)
    .bind(scope.to)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| serde_json::json!({ dim.key: row.value, "count": row.count }))
        .collect())
}

async fn top_cities(pool: &PgPool, scope: &Scope<'_>) -> Result<Vec<serde_json::Value>, sqlx::Error> {
    let rows = sqlx::query_as::<_, Ranked>(&format!(
        "SELECT city AS value, country AS extra, COUNT(*)::bigint AS count \
         FROM page_views WHERE {FILTER} AND city IS NOT NULL \
         GROUP BY city, country ORDER BY count DESC LIMIT {TOP_LIMIT}"
    ))
    .bind(scope.page_id)
    .bind(scope.page_type)
    .bind(scope.from)
    .bind(scope.to)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| serde_json::json!({ "city": row.value, "country": row.extra, "count": row.count }))
        .collect())
}

/// Views per day over the last 30 days, newest first
async fn daily(pool: &PgPool, scope: &Scope<'_>) -> Result<Vec<DailyViews>, sqlx::Error> {
    sqlx::query_as::<_, DailyViews>(
        r#"
        SELECT DATE(created_at) AS date, COUNT(*)::bigint AS count
        FROM page_views
        WHERE page_id = $1 AND page_type = $2 AND created_at >= NOW() - INTERVAL '30 days'
        GROUP BY DATE(created_at)
        ORDER BY date DESC
        "#,
    )
    .bind(scope.page_id)
    .bind(scope.page_type)
    .fetch_all(pool)
    .await
}

async fn recent(pool: &PgPool, scope: &Scope<'_>) -> Result<Vec<RecentView>, sqlx::Error> {
    sqlx::query_as::<_, RecentView>(&format!(
        "SELECT id, country, city, device, os, browser, referrer_domain, created_at \
         FROM page_views WHERE {FILTER} ORDER BY created_at DESC LIMIT {RECENT_LIMIT}"
    ))
    .bind(scope.page_id)
    .bind(scope.page_type)
    .bind(scope.from)
    .bind(scope.to)
    .fetch_all(pool)
    .await
}

/// Aggregate statistics for one page
pub async fn page_stats(
    pool: &PgPool,
    page_id: &str,
    page_type: PageType,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<PageStats, sqlx::Error> {
    let scope = Scope { page_id, page_type, from, to };

    Ok(PageStats {
        overview: overview(pool, &scope).await?,
        top_countries: top(pool, &scope, &COUNTRY).await?,
        top_cities: top_cities(pool, &scope).await?,
        top_devices: top(pool, &scope, &DEVICE).await?,
        top_os: top(pool, &scope, &OS).await?,
        top_browsers: top(pool, &scope, &BROWSER).await?,
        top_referrers: top(pool, &scope, &REFERRER).await?,
        top_languages: top(pool, &scope, &LANGUAGE).await?,
        top_utm_sources: top(pool, &scope, &UTM_SOURCE).await?,
        daily_views: daily(pool, &scope).await?,
        recent_views: recent(pool, &scope).await?,
    })
}
