//! Test suite for link-ai
//!
//! - `integration/api` drives the full router through `axum-test`
//! - `integration/database` needs `TEST_DATABASE_URL` and skips without it
//! - `property` holds proptest invariants

pub mod common;
#[cfg(feature = "ssr")]
pub mod integration;
#[cfg(feature = "ssr")]
pub mod property;
