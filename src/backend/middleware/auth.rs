/**
 * Authentication Middleware
 *
 * Protects routes that require a signed-in user. The bearer token is
 * verified against `JWT_SECRET` and the resulting `AuthenticatedUser` is
 * stored in the request extensions for handlers and later middleware.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::{verify_token, Role};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the JWT
#[derive(Clone, Debug, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(parts_headers: &axum::http::HeaderMap) -> Result<&str, BackendError> {
    parts_headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            tracing::debug!("Missing or malformed Authorization header");
            BackendError::unauthorized("Authorization token not provided")
        })
}

/// Authentication middleware
///
/// Returns 401 when the token is missing, invalid, expired or has no subject.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers())?;

    let claims = verify_token(&app_state.config.jwt_secret, token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("Invalid token")
    })?;

    let user_id = claims
        .subject()
        .ok_or_else(|| BackendError::unauthorized("Invalid token"))?
        .to_string();

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        role: claims.role(),
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Reject non-admin users with 403; must run after `auth_middleware`
pub async fn require_admin(request: Request, next: Next) -> Result<Response, BackendError> {
    let is_admin = request
        .extensions()
        .get::<AuthenticatedUser>()
        .is_some_and(AuthenticatedUser::is_admin);

    if !is_admin {
        return Err(BackendError::forbidden("Access denied. Administrators only."));
    }
    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Authorization token not provided")
            })
    }
}
