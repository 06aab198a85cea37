//! Redis test fixtures
//!
//! Tests that need Redis read `TEST_REDIS_URL` and are skipped when it is
//! not set.

use link_ai::backend::cache::CacheService;

/// Connect to the test Redis and empty it, or `None` when not configured
pub async fn test_cache() -> Option<CacheService> {
    let Ok(url) = std::env::var("TEST_REDIS_URL") else {
        eprintln!("TEST_REDIS_URL not set; skipping cache test");
        return None;
    };

    let cache = CacheService::connect(Some(&url)).await;
    assert!(cache.is_enabled(), "Failed to connect to TEST_REDIS_URL");
    assert!(cache.flush_all().await, "Failed to flush test cache");
    Some(cache)
}
