/**
 * Application State Management
 *
 * `AppState` is the central state container shared by every handler. The
 * `FromRef` implementations let handlers extract just the piece they need.
 *
 * # Optional Services
 *
 * Both databases are `Option<PgPool>`: a missing `DATABASE_URL` or
 * `MAIN_DATABASE_URL` disables the features that need them, and those
 * handlers answer 503. The cache degrades to a no-op on its own.
 *
 * # Example
 *
 * ```rust,ignore
 * use link_ai::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let page = state.cache.get::<String>("ssr:page:home").await;
 * }
 * ```
 */

use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::cache::CacheService;
use crate::backend::error::BackendError;
use crate::backend::metrics::Metrics;
use crate::backend::upstream::MainBackendClient;
use crate::shared::AppConfig;

#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<AppConfig>,

    /// Local (microservice) database
    ///
    /// `None` when `DATABASE_URL` is not set or the connection failed.
    pub db_pool: Option<PgPool>,

    /// Main application database (users, plans, credits, settings)
    pub main_db_pool: Option<PgPool>,

    /// Redis cache, disabled when Redis is not configured
    pub cache: CacheService,

    pub metrics: Metrics,

    /// Shared outbound HTTP client (AI providers)
    pub http_client: reqwest::Client,

    /// Client for the main backend
    pub upstream: MainBackendClient,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("database", &self.db_pool.is_some())
            .field("main_database", &self.main_db_pool.is_some())
            .field("cache", &self.cache)
            .finish()
    }
}

impl AppState {
    /// Assemble state from already-connected services
    pub fn new(
        config: AppConfig,
        db_pool: Option<PgPool>,
        main_db_pool: Option<PgPool>,
        cache: CacheService,
    ) -> Self {
        let http_client = reqwest::Client::new();
        let upstream = MainBackendClient::new(
            http_client.clone(),
            &config.backend_url,
            &config.internal_api_key,
        );
        Self {
            config: Arc::new(config),
            db_pool,
            main_db_pool,
            cache,
            metrics: Metrics::new(),
            http_client,
            upstream,
        }
    }

    /// The local database, or 503
    pub fn db(&self) -> Result<&PgPool, BackendError> {
        self.db_pool
            .as_ref()
            .ok_or_else(|| BackendError::unavailable("Database"))
    }

    /// The main database, or 503
    pub fn main_db(&self) -> Result<&PgPool, BackendError> {
        self.main_db_pool
            .as_ref()
            .ok_or_else(|| BackendError::unavailable("Main database"))
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for CacheService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.cache.clone()
    }
}

impl FromRef<AppState> for Metrics {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.metrics.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
