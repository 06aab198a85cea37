/**
 * Main Backend HTTP Client
 *
 * Internal calls are authenticated with `Bearer INTERNAL_API_KEY`; the
 * domain lookup is public.
 */

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::types::{CustomDomain, DomainLookupResponse, PageSyncPayload};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
const INTERNAL_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct MainBackendClient {
    client: Client,
    base_url: String,
    internal_api_key: String,
}

impl MainBackendClient {
    pub fn new(client: Client, base_url: &str, internal_api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            internal_api_key: internal_api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a host name to a custom domain
    ///
    /// `Ok(None)` when the backend does not know the domain (any non-2xx
    /// answer, or a body without `domain`).
    pub async fn lookup_domain(&self, domain: &str) -> Result<Option<CustomDomain>, reqwest::Error> {
        let response = self
            .client
            .post(format!("{}/api/domains/lookup", self.base_url))
            .timeout(LOOKUP_TIMEOUT)
            .json(&serde_json::json!({ "domain": domain }))
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("Domain lookup for {} returned {}", domain, response.status());
            return Ok(None);
        }

        let body: DomainLookupResponse = response.json().await?;
        Ok(body.domain.filter(|d| !d.domain.is_empty()))
    }

    /// Push a newly created page to the main backend
    pub async fn sync_page(&self, page: &PageSyncPayload) -> Result<(), reqwest::Error> {
        self.client
            .post(format!("{}/api/ai-pages/sync", self.base_url))
            .timeout(INTERNAL_TIMEOUT)
            .bearer_auth(&self.internal_api_key)
            .json(page)
            .send()
            .await?
            .error_for_status()?;

        info!("Page {} synced to main backend", page.id);
        Ok(())
    }

    /// Ask the main backend to pay the referral signup reward
    pub async fn credit_signup_reward(&self, referred_user_id: &str) -> Result<(), reqwest::Error> {
        self.client
            .post(format!("{}/api/referrals/credit-signup-reward", self.base_url))
            .timeout(INTERNAL_TIMEOUT)
            .bearer_auth(&self.internal_api_key)
            .json(&serde_json::json!({ "referredUserId": referred_user_id }))
            .send()
            .await?
            .error_for_status()?;

        info!("Referral signup reward processed for user {}", referred_user_id);
        Ok(())
    }

    /// `sync_page` with failures logged
    pub async fn sync_page_logged(&self, page: &PageSyncPayload) {
        if let Err(e) = self.sync_page(page).await {
            warn!("Failed to sync page {} to main backend: {}", page.id, e);
        }
    }

    /// `credit_signup_reward` with failures logged
    pub async fn credit_signup_reward_logged(&self, referred_user_id: &str) {
        if let Err(e) = self.credit_signup_reward(referred_user_id).await {
            warn!("Failed to process referral reward for {}: {}", referred_user_id, e);
        }
    }
}
