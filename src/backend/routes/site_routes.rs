//! Public site routes: rendered pages and their PWA assets
//!
//! - `GET /`                      - Custom root domain redirect
//! - `GET /{slug}`                - Server-rendered page
//! - `GET /{slug}/manifest.json`  - Web app manifest
//! - `GET /{slug}/sw.js`          - Service worker
//! - `GET /{slug}/offline.html`   - Offline fallback page

use axum::{routing::get, Router};

use crate::backend::pwa::handlers::{manifest, offline, service_worker_script};
use crate::backend::render::handlers::{render_page, render_root};
use crate::backend::server::state::AppState;

pub fn configure_site_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/", get(render_root))
        .route("/{slug}", get(render_page))
        .route("/{slug}/manifest.json", get(manifest))
        .route("/{slug}/sw.js", get(service_worker_script))
        .route("/{slug}/offline.html", get(offline))
}
