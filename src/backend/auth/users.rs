/**
 * User Records
 *
 * The main application owns users. This service keeps a local copy in its
 * own `users` table so pages can reference their owner, and fills it on
 * demand from the main database.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User as stored locally and in the main database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID assigned by the main application
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub email_verified: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const USER_COLUMNS: &str =
    "id, name, email, email_verified, image, role, created_at, updated_at";

/// The main database may store `role` as an enum and timestamps without a zone
const MAIN_USER_COLUMNS: &str = "id::text AS id, name, email, email_verified::timestamptz AS email_verified, image, \
     role::text AS role, created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at";

/// Find a local user by ID, or by email when the ID is unknown
pub async fn find_local_user(
    pool: &PgPool,
    id: &str,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1 OR email = $2 LIMIT 1"
    ))
    .bind(id)
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Load a user from the main database
pub async fn fetch_main_user(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {MAIN_USER_COLUMNS} FROM users WHERE id::text = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Insert or refresh the local copy of a user
pub async fn upsert_user(pool: &PgPool, user: &User) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, name, email, email_verified, image, role, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE
        SET name = EXCLUDED.name,
            email = EXCLUDED.email,
            email_verified = EXCLUDED.email_verified,
            image = EXCLUDED.image,
            role = EXCLUDED.role,
            updated_at = EXCLUDED.updated_at
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.email_verified)
    .bind(&user.image)
    .bind(&user.role)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(pool)
    .await
}

/// Number of local users
pub async fn count_users(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

/// Whether the error is a unique-constraint violation (SQLSTATE 23505)
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
