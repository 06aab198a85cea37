//! link-ai - AI page generation microservice
//!
//! link-ai generates web pages through third-party LLM APIs (Claude and
//! OpenAI), persists them in PostgreSQL and serves them back as
//! server-rendered HTML with SEO meta tags, tracking pixels, PWA assets and
//! an analytics beacon injected at render time.
//!
//! # Overview
//!
//! This library provides:
//! - AI page CRUD and streaming generation over Server-Sent Events
//! - Server-side rendering with a Redis cache-aside read path (`X-Cache`)
//! - Per-page PWA manifest, service worker and offline page
//! - Analytics ingestion and aggregated page statistics
//! - A credits ledger kept in the separate "main" database
//! - Prometheus metrics
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types and configuration shared by every module
//!   - SSE generation events
//!   - Application configuration
//!   - Error types
//!
//! - **`backend`** - Server-side code (only compiled with the `ssr` feature)
//!   - Axum HTTP server, routes and middleware
//!   - Page storage, rendering and PWA generation
//!   - AI providers, cache, credits, analytics and metrics
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use link_ai::backend::server::init::create_app;
//! use link_ai::shared::AppConfig;
//!
//! # async fn example() {
//! let config = AppConfig::from_env().expect("invalid configuration");
//! let app = create_app(config).await;
//! // Serve `app` with axum::serve
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `Result<T, E>` for fallible operations, propagated with `?`
//! - `shared::error::SharedError` for validation and serialization failures
//! - `backend::error::BackendError` for everything an HTTP handler can return

/// Shared types and configuration
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
