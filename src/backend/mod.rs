//! Backend Module
//!
//! All server-side code for link-ai: an Axum HTTP server that generates
//! pages with LLM providers, stores them in PostgreSQL and serves them as
//! server-rendered HTML.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Initialization, application state, service loading
//! - **`routes`** - Route groups and router assembly
//! - **`middleware`** - JWT auth, user sync, custom domains, request metrics
//! - **`auth`** - JWT claims and local/main user records
//! - **`pages`** - Page storage, CRUD handlers, public page API, slugs
//! - **`generation`** - Claude/OpenAI providers, prompts, SSE generation
//! - **`render`** - Server-side rendering with meta/pixel/PWA/analytics injection
//! - **`pwa`** - Per-page manifest, service worker and offline page
//! - **`analytics`** - View tracking and aggregated statistics
//! - **`credits`** - Credit checks and consumption in the main database
//! - **`cache`** - Redis cache-aside service and key builders
//! - **`metrics`** - Prometheus registry and metrics endpoints
//! - **`upstream`** - Client for the main application backend
//! - **`db`** - Transient-failure retry for database reads
//! - **`error`** - `BackendError` and its JSON response mapping
//!
//! # Request Flow
//!
//! 1. **Layers**: tracing, CORS, CSP, custom-domain lookup, metrics
//! 2. **Route middleware**: JWT verification and user sync on `/api/ai-pages`
//! 3. **Handler**: reads through the cache, falls back to the database
//! 4. **Response**: JSON, SSE, or HTML with an `X-Cache` header

pub mod analytics;
pub mod auth;
pub mod cache;
pub mod credits;
pub mod db;
pub mod error;
pub mod generation;
pub mod metrics;
pub mod middleware;
pub mod pages;
pub mod pwa;
pub mod render;
pub mod routes;
pub mod server;
pub mod upstream;

pub use error::BackendError;
pub use server::create_app;
