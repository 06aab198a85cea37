/**
 * Server Initialization
 *
 * Builds the application from configuration: connects the optional
 * services, assembles `AppState`, starts the gauge refresh task and
 * configures the router.
 *
 * The server is resilient to missing services. Without a database the
 * page and analytics routes answer 503; without Redis every read goes to
 * the database.
 */

use axum::Router;
use std::time::Duration;

use crate::backend::auth::users::count_users;
use crate::backend::pages::db::count_pages;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_cache, load_database, load_main_database};
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// How often the active pages/users gauges are recomputed
pub const GAUGE_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Router<()> {
    tracing::info!("Initializing link-ai server");
    if config.uses_default_jwt_secret() {
        tracing::warn!("JWT_SECRET is not set; using the development default");
    }

    let db_pool = load_database(&config).await;
    let main_db_pool = load_main_database(&config).await;
    let cache = load_cache(&config).await;

    let app_state = AppState::new(config, db_pool, main_db_pool, cache);
    spawn_gauge_refresh(app_state.clone());

    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}

/// Refresh `active_pages_total` and `active_users_total` periodically
pub fn spawn_gauge_refresh(state: AppState) {
    let Some(pool) = state.db_pool.clone() else {
        return;
    };

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(GAUGE_REFRESH_INTERVAL);
        loop {
            interval.tick().await;
            match count_pages(&pool).await {
                Ok(pages) => state.metrics.set_active_pages(pages),
                Err(e) => tracing::debug!("Failed to count pages for gauges: {:?}", e),
            }
            match count_users(&pool).await {
                Ok(users) => state.metrics.set_active_users(users),
                Err(e) => tracing::debug!("Failed to count users for gauges: {:?}", e),
            }
        }
    });
}
