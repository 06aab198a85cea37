/**
 * Provider API Settings
 *
 * API keys are managed in the admin panel of the main application and
 * stored in its `system_settings` table. Lookup order:
 *
 * 1. Redis (`api_settings:all`, 5 minutes)
 * 2. Main database `system_settings` (non-empty values only)
 * 3. Local database `system_settings`
 * 4. `ANTHROPIC_API_KEY` / `OPENAI_API_KEY` from the environment
 */

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::BTreeMap;

use crate::backend::cache::{keys, CacheService};
use crate::shared::config::ProviderConfig;

pub const ANTHROPIC_KEY: &str = "anthropic_api_key";
pub const OPENAI_KEY: &str = "openai_api_key";
pub const GEMINI_KEY: &str = "gemini_api_key";

const SETTING_KEYS: [&str; 3] = [ANTHROPIC_KEY, OPENAI_KEY, GEMINI_KEY];

/// Resolved provider keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl ApiSettings {
    /// Build from `system_settings` rows, ignoring blank values
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            anthropic_api_key: get(ANTHROPIC_KEY),
            openai_api_key: get(OPENAI_KEY),
            gemini_api_key: get(GEMINI_KEY),
        }
    }

    /// Fill keys missing from the database with the environment values
    pub fn with_env_fallback(mut self, providers: &ProviderConfig) -> Self {
        if self.anthropic_api_key.is_none() {
            self.anthropic_api_key = providers.anthropic_api_key.clone();
        }
        if self.openai_api_key.is_none() {
            self.openai_api_key = providers.openai_api_key.clone();
        }
        self
    }
}

async fn query_settings(pool: &PgPool) -> Result<BTreeMap<String, String>, sqlx::Error> {
    let keys: Vec<String> = SETTING_KEYS.iter().map(|k| k.to_string()).collect();
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT key, value FROM system_settings WHERE key = ANY($1)")
            .bind(&keys)
            .fetch_all(pool)
            .await?;

    Ok(rows
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .collect())
}

/// Load the raw settings map following the lookup order above
pub async fn load_settings_map(
    cache: &CacheService,
    main_db: Option<&PgPool>,
    local_db: Option<&PgPool>,
) -> BTreeMap<String, String> {
    if let Some(cached) = cache.get::<BTreeMap<String, String>>(keys::API_SETTINGS_KEY).await {
        return cached;
    }

    if let Some(pool) = main_db {
        match query_settings(pool).await {
            Ok(map) => {
                cache
                    .set(keys::API_SETTINGS_KEY, &map, Some(keys::API_SETTINGS_TTL_SECS))
                    .await;
                return map;
            }
            Err(e) => tracing::warn!("Failed to read API settings from main database: {:?}", e),
        }
    }

    if let Some(pool) = local_db {
        match query_settings(pool).await {
            Ok(map) => return map,
            Err(e) => tracing::warn!("Failed to read API settings from local database: {:?}", e),
        }
    }

    BTreeMap::new()
}

/// Resolve the provider keys, falling back to the environment
pub async fn load_api_settings(
    cache: &CacheService,
    main_db: Option<&PgPool>,
    local_db: Option<&PgPool>,
    providers: &ProviderConfig,
) -> ApiSettings {
    let map = load_settings_map(cache, main_db, local_db).await;
    ApiSettings::from_map(&map).with_env_fallback(providers)
}
