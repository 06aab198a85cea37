//! Tests against a real Redis instance (`TEST_REDIS_URL`)

pub mod ssr_cache_test;
