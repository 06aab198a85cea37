//! Authentication test helpers

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use link_ai::backend::auth::{create_token, Role};

/// Secret every test server is configured with
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

const TOKEN_TTL_SECS: u64 = 3600;

/// A signed token for `user_id`
pub fn token_for(user_id: &str, role: Role) -> String {
    create_token(
        TEST_JWT_SECRET,
        user_id,
        &format!("{user_id}@example.com"),
        role,
        TOKEN_TTL_SECS,
    )
    .expect("Failed to create test token")
}

/// `Authorization: Bearer <token>` as a header pair
pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header"),
    )
}

pub fn user_auth(user_id: &str) -> (HeaderName, HeaderValue) {
    bearer(&token_for(user_id, Role::User))
}

pub fn admin_auth(user_id: &str) -> (HeaderName, HeaderValue) {
    bearer(&token_for(user_id, Role::Admin))
}
