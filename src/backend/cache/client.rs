/**
 * Redis Cache Service
 *
 * Thin wrapper over a Redis `ConnectionManager`. The service is optional:
 * when no Redis URL is configured, or the first connection fails, every
 * operation degrades to a no-op (`get` misses, `set` reports `false`, counts
 * are zero) and the server keeps working against the database alone.
 *
 * Values are stored as JSON strings so any `Serialize` type can be cached,
 * including plain `String` HTML documents.
 */

use std::time::Duration;

use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client,
};
use serde::{de::DeserializeOwned, Serialize};

/// Default time-to-live for `set` when none is given (seconds)
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Snapshot returned by `GET /metrics/cache`
#[derive(Debug, Clone, serde::Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub connected: bool,
    pub db_size: i64,
    pub info: Option<String>,
}

/// Redis-backed cache, disabled when Redis is unavailable
#[derive(Clone)]
pub struct CacheService {
    conn: Option<ConnectionManager>,
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl CacheService {
    /// Connect to Redis, falling back to a disabled cache on any failure
    pub async fn connect(redis_url: Option<&str>) -> Self {
        let Some(url) = redis_url else {
            tracing::warn!("Redis not configured. Cache will be disabled.");
            return Self::disabled();
        };

        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(3)
            .set_connection_timeout(Duration::from_secs(2));

        let client = match Client::open(url) {
            Ok(client) => client,
            Err(e) => {
                tracing::error!("Invalid Redis URL: {:?}", e);
                return Self::disabled();
            }
        };

        match client.get_connection_manager_with_config(config).await {
            Ok(conn) => {
                tracing::info!("Redis connected");
                Self { conn: Some(conn) }
            }
            Err(e) => {
                tracing::error!("Failed to connect to Redis: {:?}", e);
                tracing::warn!("Cache will be disabled.");
                Self::disabled()
            }
        }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self { conn: None }
    }

    /// Whether a Redis connection is available
    pub fn is_enabled(&self) -> bool {
        self.conn.is_some()
    }

    /// Read and deserialize a cached value
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone()?;
        let raw: Option<String> = match conn.get(key).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Cache GET {} failed: {:?}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw?) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Cached value for {} is not valid JSON: {}", key, e);
                None
            }
        }
    }

    /// Serialize and store a value with a TTL (`DEFAULT_TTL_SECS` when `None`)
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_secs: Option<u64>) -> bool {
        let Some(mut conn) = self.conn.clone() else {
            return false;
        };
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Cannot serialize cache value for {}: {}", key, e);
                return false;
            }
        };

        match conn
            .set_ex::<_, _, ()>(key, payload, ttl_secs.unwrap_or(DEFAULT_TTL_SECS))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Cache SETEX {} failed: {:?}", key, e);
                false
            }
        }
    }

    /// Delete a single key; `true` only when the key existed and was removed
    pub async fn del(&self, key: &str) -> bool {
        self.del_many(&[key.to_string()]).await > 0
    }

    /// Delete several keys, returning how many existed
    pub async fn del_many(&self, keys: &[String]) -> u64 {
        let Some(mut conn) = self.conn.clone() else {
            return 0;
        };
        if keys.is_empty() {
            return 0;
        }
        match conn.del::<_, u64>(keys).await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::warn!("Cache DEL {:?} failed: {:?}", keys, e);
                0
            }
        }
    }

    /// Delete every key matching a glob pattern (`KEYS` + `DEL`)
    pub async fn del_pattern(&self, pattern: &str) -> u64 {
        let Some(mut conn) = self.conn.clone() else {
            return 0;
        };
        let keys: Vec<String> = match conn.keys(pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("Cache KEYS {} failed: {:?}", pattern, e);
                return 0;
            }
        };
        let deleted = self.del_many(&keys).await;
        tracing::info!("Removed {} cache keys matching {}", deleted, pattern);
        deleted
    }

    /// Increment a counter; the TTL is applied when the counter is created
    pub async fn increment(&self, key: &str, ttl_secs: Option<u64>) -> i64 {
        let Some(mut conn) = self.conn.clone() else {
            return 0;
        };
        let value: i64 = match conn.incr(key, 1).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Cache INCR {} failed: {:?}", key, e);
                return 0;
            }
        };
        if value == 1 {
            if let Some(ttl) = ttl_secs {
                if let Err(e) = conn.expire::<_, ()>(key, ttl as i64).await {
                    tracing::warn!("Cache EXPIRE {} failed: {:?}", key, e);
                }
            }
        }
        value
    }

    /// Remaining TTL in seconds; -2 when the key (or the cache) is missing
    pub async fn ttl(&self, key: &str) -> i64 {
        let Some(mut conn) = self.conn.clone() else {
            return -2;
        };
        conn.ttl(key).await.unwrap_or(-2)
    }

    /// Drop every key in the current database
    pub async fn flush_all(&self) -> bool {
        let Some(mut conn) = self.conn.clone() else {
            return false;
        };
        match redis::cmd("FLUSHALL").query_async::<()>(&mut conn).await {
            Ok(()) => {
                tracing::warn!("Redis cache flushed");
                true
            }
            Err(e) => {
                tracing::error!("Cache FLUSHALL failed: {:?}", e);
                false
            }
        }
    }

    /// Key count and `INFO stats` output
    pub async fn stats(&self) -> CacheStats {
        let Some(mut conn) = self.conn.clone() else {
            return CacheStats {
                connected: false,
                db_size: 0,
                info: None,
            };
        };
        let info = redis::cmd("INFO")
            .arg("stats")
            .query_async::<String>(&mut conn)
            .await
            .ok();
        let db_size = redis::cmd("DBSIZE")
            .query_async::<i64>(&mut conn)
            .await
            .unwrap_or(0);

        CacheStats {
            connected: info.is_some(),
            db_size,
            info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_cache_is_disabled() {
        let cache = CacheService::connect(None).await;
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_invalid_url_disables_cache() {
        let cache = CacheService::connect(Some("not a redis url")).await;
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_cache_operations_are_noops() {
        let cache = CacheService::disabled();

        assert_eq!(cache.get::<String>("ssr:page:home").await, None);
        assert!(!cache.set("ssr:page:home", "<html></html>", None).await);
        assert!(!cache.del("ssr:page:home").await);
        assert_eq!(cache.del_pattern("ssr:*").await, 0);
        assert_eq!(cache.increment("counter", Some(60)).await, 0);
        assert_eq!(cache.ttl("ssr:page:home").await, -2);
        assert!(!cache.flush_all().await);
        assert_eq!(
            cache.stats().await,
            CacheStats {
                connected: false,
                db_size: 0,
                info: None
            }
        );
    }
}
