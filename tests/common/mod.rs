//! Common test utilities and helpers
//!
//! - Test server and state construction
//! - Database and Redis fixtures
//! - Mock main backend and AI providers (wiremock)
//! - Token helpers
//! - Custom assertion macros

pub mod assertions;
#[cfg(feature = "ssr")]
pub mod auth_helpers;
#[cfg(feature = "ssr")]
pub mod cache;
#[cfg(feature = "ssr")]
pub mod database;
#[cfg(feature = "ssr")]
pub mod mock_server;

#[cfg(feature = "ssr")]
pub use self::server::*;

#[cfg(feature = "ssr")]
mod server {
    use axum_test::TestServer;
    use link_ai::backend::cache::CacheService;
    use link_ai::backend::routes::create_router;
    use link_ai::backend::server::state::AppState;
    use link_ai::shared::AppConfig;
    use sqlx::PgPool;

    use super::auth_helpers::TEST_JWT_SECRET;

    /// Configuration pointing the main backend at `backend_url`
    pub fn test_config(backend_url: &str) -> AppConfig {
        AppConfig::builder()
            .jwt_secret(TEST_JWT_SECRET)
            .backend_url(backend_url)
            .internal_api_key("test-internal-key")
            .build()
            .expect("valid test configuration")
    }

    /// State with no databases and a disabled cache
    pub fn offline_state(backend_url: &str) -> AppState {
        AppState::new(test_config(backend_url), None, None, CacheService::disabled())
    }

    /// State backed by a local database
    pub fn database_state(backend_url: &str, pool: PgPool) -> AppState {
        AppState::new(
            test_config(backend_url),
            Some(pool.clone()),
            Some(pool),
            CacheService::disabled(),
        )
    }

    /// State backed by a local database and a live cache
    pub fn cached_state(backend_url: &str, pool: PgPool, cache: CacheService) -> AppState {
        AppState::new(test_config(backend_url), Some(pool.clone()), Some(pool), cache)
    }

    /// State whose Claude provider points at `anthropic_url`; `main_db`
    /// toggles whether the credit ledger is reachable
    pub fn generation_state(backend_url: &str, anthropic_url: &str, pool: PgPool, main_db: bool) -> AppState {
        let config = AppConfig::builder()
            .jwt_secret(TEST_JWT_SECRET)
            .backend_url(backend_url)
            .internal_api_key("test-internal-key")
            .anthropic("test-anthropic-key", anthropic_url)
            .build()
            .expect("valid test configuration");
        let main = main_db.then(|| pool.clone());
        AppState::new(config, Some(pool), main, CacheService::disabled())
    }

    pub fn test_server(state: AppState) -> TestServer {
        TestServer::new(create_router(state)).expect("Failed to start test server")
    }
}
