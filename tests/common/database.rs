//! Database test fixtures
//!
//! Tests that need PostgreSQL read `TEST_DATABASE_URL` and are skipped when
//! it is not set. The same database stands in for the main database, so the
//! plan and ledger tables it owns are created here.

use sqlx::PgPool;

/// Connect and migrate the test database, or `None` when not configured
pub async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return None;
    };

    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to create test database pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    create_credit_tables(&pool)
        .await
        .expect("Failed to create credit tables");
    cleanup_test_data(&pool).await.expect("Failed to clean test data");
    Some(pool)
}

/// Remove all rows while preserving the schema
pub async fn cleanup_test_data(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "TRUNCATE TABLE page_views, ai_pages, users, system_settings, \
         credit_transactions, user_plans, plans",
    )
        .execute(pool)
        .await?;
    Ok(())
}

/// Insert a local user so the sync middleware lets requests through
pub async fn insert_user(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (id, name, email, role) VALUES ($1, $1, $2, 'USER')")
        .bind(id)
        .bind(format!("{id}@example.com"))
        .execute(pool)
        .await?;
    Ok(())
}

/// Main-database tables read and written by the credit ledger
async fn create_credit_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    let statements = [
        r#"CREATE TABLE IF NOT EXISTS plans (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            can_create_pages BOOLEAN NOT NULL DEFAULT TRUE,
            custom_domains_limit INTEGER NOT NULL DEFAULT 0,
            pwa_enabled BOOLEAN NOT NULL DEFAULT FALSE
        )"#,
        r#"CREATE TABLE IF NOT EXISTS user_plans (
            user_id TEXT PRIMARY KEY,
            plan_id TEXT NOT NULL,
            status TEXT NOT NULL,
            credits_available DOUBLE PRECISION NOT NULL,
            credits_used DOUBLE PRECISION NOT NULL DEFAULT 0,
            custom_domains_used INTEGER NOT NULL DEFAULT 0
        )"#,
        r#"CREATE TABLE IF NOT EXISTS credit_transactions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            type TEXT NOT NULL,
            amount DOUBLE PRECISION NOT NULL,
            balance DOUBLE PRECISION NOT NULL,
            description TEXT,
            reference TEXT,
            created_at TIMESTAMPTZ NOT NULL
        )"#,
    ];
    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Give `user_id` an ACTIVE plan named `plan_name` holding `credits`
pub async fn grant_plan(pool: &PgPool, user_id: &str, plan_name: &str, credits: f64) -> Result<(), sqlx::Error> {
    let plan_id = format!("plan-{}", plan_name.to_lowercase());
    sqlx::query("INSERT INTO plans (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
        .bind(&plan_id)
        .bind(plan_name)
        .execute(pool)
        .await?;
    sqlx::query(
        "INSERT INTO user_plans (user_id, plan_id, status, credits_available) VALUES ($1, $2, 'ACTIVE', $3)",
    )
    .bind(user_id)
    .bind(&plan_id)
    .bind(credits)
    .execute(pool)
    .await?;
    Ok(())
}

/// Current balance of `user_id`
pub async fn credits_available(pool: &PgPool, user_id: &str) -> f64 {
    sqlx::query_scalar("SELECT credits_available FROM user_plans WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read balance")
}

/// Ledger rows recorded for `user_id`
pub async fn transaction_count(pool: &PgPool, user_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM credit_transactions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count transactions")
}
