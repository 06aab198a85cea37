//! HTTP surface tests

pub mod analytics_test;
pub mod health_test;
pub mod metrics_test;
pub mod pages_test;
pub mod site_test;

/// Main backend URL for tests that never reach it
pub const UNUSED_BACKEND: &str = "http://127.0.0.1:9";
