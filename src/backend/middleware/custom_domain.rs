/**
 * Custom Domain Middleware
 *
 * Resolves the request host against the main backend and attaches the
 * resulting `CustomDomain` to the request. Platform hosts are skipped and
 * any lookup failure simply continues without a domain.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::HOST, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

use crate::backend::server::state::AppState;
use crate::backend::upstream::CustomDomain;

/// Hosts that are never custom domains
const PLATFORM_HOSTS: &[&str] = &[
    "localhost",
    "127.0.0.1",
    "vercel.app",
    "herokuapp.com",
    "railway.app",
];

/// The domain to look up for a `Host` header, if any
pub fn lookup_host(host: &str) -> Option<&str> {
    if host.is_empty() || PLATFORM_HOSTS.iter().any(|skip| host.contains(skip)) {
        return None;
    }
    host.split(':').next().filter(|domain| !domain.is_empty())
}

pub async fn custom_domain_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().host())
        .and_then(lookup_host)
        .map(str::to_string);

    if let Some(domain) = host {
        match app_state.upstream.lookup_domain(&domain).await {
            Ok(Some(custom)) => {
                tracing::debug!("Custom domain resolved: {} -> page {}", custom.domain, custom.page_id);
                request.extensions_mut().insert(custom);
            }
            Ok(None) => tracing::debug!("No active custom domain for {}", domain),
            Err(e) => tracing::warn!("Custom domain lookup for {} failed: {}", domain, e),
        }
    }

    next.run(request).await
}

/// Extractor for the optional custom domain attached by the middleware
#[derive(Debug, Clone, Default)]
pub struct MaybeCustomDomain(pub Option<CustomDomain>);

impl MaybeCustomDomain {
    pub fn domain_name(&self) -> Option<&str> {
        self.0.as_ref().map(|d| d.domain.as_str())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeCustomDomain {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeCustomDomain(parts.extensions.get::<CustomDomain>().cloned()))
    }
}
