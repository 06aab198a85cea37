//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`auth`** - Bearer token verification, admin guard, `AuthUser` extractor
//! - **`user_sync`** - Copies the authenticated user from the main database
//! - **`custom_domain`** - Resolves custom domains through the main backend
//! - **`metrics`** - HTTP request counters and latency histograms
//!
//! # Ordering
//!
//! Protected routes run `auth_middleware` then `ensure_user_exists`.
//! `custom_domain_middleware` and `track_metrics` apply to every route.

pub mod auth;
pub mod custom_domain;
pub mod metrics;
pub mod user_sync;

pub use auth::{auth_middleware, require_admin, AuthUser, AuthenticatedUser};
pub use custom_domain::{custom_domain_middleware, MaybeCustomDomain};
pub use metrics::track_metrics;
pub use user_sync::ensure_user_exists;
