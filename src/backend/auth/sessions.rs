/**
 * JWT Tokens
 *
 * Tokens are issued by the main application. The subject is carried either
 * in `sub` or in `userId`, and `role` defaults to `USER`.
 */

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// User role carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Lenient parse; anything other than `ADMIN` is a regular user
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("ADMIN") {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

impl Claims {
    /// `sub`, or `userId` when `sub` is absent
    pub fn subject(&self) -> Option<&str> {
        self.sub
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.user_id.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn role(&self) -> Role {
        self.role.as_deref().map(Role::parse).unwrap_or_default()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Create a token for a user, valid for `ttl_secs`
pub fn create_token(
    secret: &str,
    user_id: &str,
    email: &str,
    role: Role,
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = now_secs();
    let claims = Claims {
        sub: Some(user_id.to_string()),
        user_id: None,
        email: email.to_string(),
        role: Some(role.as_str().to_string()),
        exp: Some(now + ttl_secs),
        iat: Some(now),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify an HS256 token and decode its claims
///
/// `exp` is checked when present but not required.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = HashSet::new();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_create_and_verify_token() {
        let token = create_token(SECRET, "user-1", "test@example.com", Role::Admin, 3600).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();

        assert_eq!(claims.subject(), Some("user-1"));
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.role(), Role::Admin);
        assert!(claims.exp.unwrap() > claims.iat.unwrap());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token(SECRET, "user-1", "a@b.c", Role::User, 3600).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        assert!(verify_token(SECRET, "invalid.token.here").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims {
            sub: Some("user-1".into()),
            exp: Some(1_000),
            ..Claims::default()
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn test_user_id_claim_and_default_role() {
        let claims = Claims {
            user_id: Some("legacy-id".into()),
            email: "x@y.z".into(),
            ..Claims::default()
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let decoded = verify_token(SECRET, &token).unwrap();
        assert_eq!(decoded.subject(), Some("legacy-id"));
        assert_eq!(decoded.role(), Role::User);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("USER"), Role::User);
        assert_eq!(Role::parse("EDITOR"), Role::User);
    }
}
