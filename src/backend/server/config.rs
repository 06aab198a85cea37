/**
 * Service Loading
 *
 * Connects the optional services named in `AppConfig`: the local database
 * (with migrations), the main database and Redis.
 *
 * # Error Handling
 *
 * Connection errors are logged but do not prevent server startup. A
 * service that fails to initialize is `None` (or a disabled cache) and the
 * routes that need it answer 503.
 */

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::backend::cache::CacheService;
use crate::shared::AppConfig;

/// Database configuration result
///
/// The connection pool if configured and reachable, `None` otherwise.
pub type DatabaseConfig = Option<PgPool>;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

async fn connect(label: &str, url: Option<&str>) -> DatabaseConfig {
    let Some(url) = url else {
        tracing::warn!("{} URL not set. Features that need it will be disabled.", label);
        return None;
    };

    tracing::info!("Connecting to {}...", label);
    match PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(url)
        .await
    {
        Ok(pool) => {
            tracing::info!("{} connection pool created successfully", label);
            Some(pool)
        }
        Err(e) => {
            tracing::error!("Failed to create {} connection pool: {:?}", label, e);
            tracing::warn!("{} features will be disabled.", label);
            None
        }
    }
}

/// Connect to the local database and run migrations
///
/// Migration failures are logged; the pool is still returned since the
/// schema may already be current.
pub async fn load_database(config: &AppConfig) -> DatabaseConfig {
    let pool = connect("Database", config.database_url.as_deref()).await?;

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(()) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

/// Connect to the main application database (never migrated from here)
pub async fn load_main_database(config: &AppConfig) -> DatabaseConfig {
    connect("Main database", config.main_database_url.as_deref()).await
}

/// Connect to Redis, or return a disabled cache
pub async fn load_cache(config: &AppConfig) -> CacheService {
    CacheService::connect(config.redis_url.as_deref()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_services_are_disabled() {
        let config = AppConfig::default();
        assert!(load_database(&config).await.is_none());
        assert!(load_main_database(&config).await.is_none());
        assert!(!load_cache(&config).await.is_enabled());
    }
}
