//! Which page a public URL refers to
//!
//! A custom root domain serves its bound page for the `root` slug and a
//! custom slug domain serves its bound page for that slug. Every other
//! request is a plain lookup by slug.

use sqlx::PgPool;

use super::pwa_tags::ROOT_SLUG;
use crate::backend::db::{with_retry, RetryPolicy};
use crate::backend::metrics::Metrics;
use crate::backend::pages::{db, AiPage};
use crate::backend::upstream::CustomDomain;

/// How a slug maps to a stored page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRef<'a> {
    /// The page bound to a custom domain (raw id from the main backend)
    Bound(&'a str),
    Slug(&'a str),
}

pub fn page_ref<'a>(slug: &'a str, custom_domain: Option<&'a CustomDomain>) -> PageRef<'a> {
    match custom_domain {
        Some(domain) if domain.is_root_domain && slug == ROOT_SLUG => PageRef::Bound(&domain.page_id),
        Some(domain) if !domain.is_root_domain && domain.slug.as_deref() == Some(slug) => {
            PageRef::Bound(&domain.page_id)
        }
        _ => PageRef::Slug(slug),
    }
}

/// Load the page for a public request, retrying transient failures
pub async fn resolve_page(
    pool: &PgPool,
    metrics: &Metrics,
    slug: &str,
    custom_domain: Option<&CustomDomain>,
) -> Result<Option<AiPage>, sqlx::Error> {
    match page_ref(slug, custom_domain) {
        PageRef::Bound(raw_id) => {
            let Some(id) = custom_domain.and_then(CustomDomain::page_uuid) else {
                tracing::warn!("Custom domain points at a malformed page id {}", raw_id);
                return Ok(None);
            };
            with_retry(metrics, RetryPolicy::default(), || db::find_by_id(pool, id)).await
        }
        PageRef::Slug(slug) => {
            with_retry(metrics, RetryPolicy::default(), || db::find_by_slug(pool, slug)).await
        }
    }
}
