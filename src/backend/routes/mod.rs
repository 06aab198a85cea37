//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Router assembly, health check, fallback, layers
//! ├── api_routes.rs   - `/api` and `/metrics` endpoints
//! └── site_routes.rs  - Rendered pages and PWA assets
//! ```

/// Main router creation
pub mod router;

/// API and metrics endpoints
pub mod api_routes;

/// Public site endpoints
pub mod site_routes;

pub use router::create_router;
