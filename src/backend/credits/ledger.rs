/**
 * Credit Ledger
 *
 * Reads plans and records consumption in the main database. Reads never
 * fail the caller: an unreadable plan is treated as no plan. A consumption
 * decrements the balance and writes the ledger row in one transaction, and
 * only goes through when the plan is ACTIVE and can cover the amount.
 */

use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::types::{ConsumeResult, CreditAction, CreditStatus, PlanPermission, UserPlan};

const PLAN_QUERY: &str = r#"
    SELECT up.user_id::text AS user_id,
           up.status::text AS status,
           up.credits_available::float8 AS credits_available,
           up.credits_used::float8 AS credits_used,
           COALESCE(up.custom_domains_used, 0)::int4 AS custom_domains_used,
           p.name AS plan_name,
           p.can_create_pages,
           p.custom_domains_limit::int4 AS custom_domains_limit,
           p.pwa_enabled
    FROM user_plans up
    LEFT JOIN plans p ON p.id = up.plan_id
    WHERE up.user_id::text = $1
"#;

pub async fn fetch_plan(pool: &PgPool, user_id: &str) -> Result<Option<UserPlan>, sqlx::Error> {
    sqlx::query_as::<_, UserPlan>(PLAN_QUERY)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Whether the user's plan is active and covers `required`
pub async fn has_credits(pool: &PgPool, user_id: &str, required: f64) -> bool {
    match fetch_plan(pool, user_id).await {
        Ok(Some(plan)) => {
            let enough = plan.can_afford(required);
            info!(
                "Credit check for {}: {} available, {} required, ok={}",
                user_id, plan.credits_available, required, enough
            );
            enough
        }
        Ok(None) => {
            info!("User {} has no plan", user_id);
            false
        }
        Err(e) => {
            error!("Credit check for {} failed: {:?}", user_id, e);
            false
        }
    }
}

pub async fn check_user_credit_status(pool: &PgPool, user_id: &str, required: f64) -> CreditStatus {
    match fetch_plan(pool, user_id).await {
        Ok(plan) => CreditStatus::evaluate(plan.as_ref(), required),
        Err(e) => {
            error!("Credit status for {} failed: {:?}", user_id, e);
            CreditStatus::no_plan(required, "Error", "Could not check the user's plan")
        }
    }
}

/// Charge `amount` credits and record the transaction
pub async fn consume_credits(
    pool: &PgPool,
    user_id: &str,
    amount: f64,
    action: CreditAction,
    description: &str,
    reference: Option<&str>,
) -> ConsumeResult {
    match try_consume(pool, user_id, amount, action, description, reference).await {
        Ok(result) => {
            if result.success {
                info!(
                    "Consumed {} credits from {} ({}), new balance {:?}",
                    amount,
                    user_id,
                    action.as_str(),
                    result.new_balance
                );
            } else {
                warn!("Could not consume credits from {}: {}", user_id, result.message);
            }
            result
        }
        Err(e) => {
            error!("Credit consumption for {} failed: {:?}", user_id, e);
            ConsumeResult::failed("Failed to process credits")
        }
    }
}

async fn try_consume(
    pool: &PgPool,
    user_id: &str,
    amount: f64,
    action: CreditAction,
    description: &str,
    reference: Option<&str>,
) -> Result<ConsumeResult, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let plan = sqlx::query_as::<_, UserPlan>(&format!("{PLAN_QUERY} FOR UPDATE OF up"))
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(plan) = plan else {
        return Ok(ConsumeResult::failed("User has no active plan"));
    };
    if !plan.is_active() {
        return Ok(ConsumeResult::failed("Plan is not active"));
    }
    if plan.credits_available < amount {
        return Ok(ConsumeResult::failed("Insufficient credits"));
    }

    let new_balance: f64 = sqlx::query_scalar(
        r#"
        UPDATE user_plans
        SET credits_available = credits_available - $2,
            credits_used = credits_used + $2
        WHERE user_id::text = $1
        RETURNING credits_available::float8
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO credit_transactions (id, user_id, type, amount, balance, description, reference, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(action.as_str())
    .bind(-amount)
    .bind(new_balance)
    .bind(description)
    .bind(reference)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(ConsumeResult {
        success: true,
        message: "Credits consumed".to_string(),
        new_balance: Some(new_balance),
    })
}

pub async fn check_plan_permission(pool: &PgPool, user_id: &str) -> PlanPermission {
    match fetch_plan(pool, user_id).await {
        Ok(Some(plan)) => PlanPermission::from(&plan),
        Ok(None) => PlanPermission::default(),
        Err(e) => {
            error!("Plan permission check for {} failed: {:?}", user_id, e);
            PlanPermission::default()
        }
    }
}
