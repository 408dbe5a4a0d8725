//! Billing database queries.

use chrono::{DateTime, Duration, Utc};
use sqlx::{PgExecutor, PgPool};

use super::BillingError;
use crate::models::billing::{
    BillingCycle, Payment, PaymentStatus, Plan, Subscription, SubscriptionStatus,
};
use crate::uuid::uuidv7;

type PlanRow = (
    String,
    String,
    String,
    i64,
    i64,
    i64,
    bool,
    bool,
    bool,
    i32,
    i32,
    i32,
    String,
    bool,
);

fn plan_from_row(row: PlanRow) -> Plan {
    let (
        id,
        name,
        description,
        price_ghs,
        price_ngn,
        price_usd,
        includes_pos,
        includes_menu,
        includes_cms,
        max_staff,
        max_tables,
        max_menu_items,
        billing_cycle,
        is_active,
    ) = row;
    Plan {
        id,
        name,
        description,
        price_ghs,
        price_ngn,
        price_usd,
        includes_pos,
        includes_menu,
        includes_cms,
        max_staff,
        max_tables,
        max_menu_items,
        billing_cycle: billing_cycle.parse().unwrap_or(BillingCycle::Monthly),
        is_active,
    }
}

const PLAN_COLUMNS: &str = "id::text, name, description, price_ghs, price_ngn, price_usd, \
     includes_pos, includes_menu, includes_cms, max_staff, max_tables, max_menu_items, \
     billing_cycle, is_active";

/// List active plans, cheapest first.
pub async fn list_plans(pool: &PgPool) -> Result<Vec<Plan>, BillingError> {
    let rows = sqlx::query_as::<_, PlanRow>(&format!(
        "SELECT {PLAN_COLUMNS} FROM plans WHERE is_active = TRUE ORDER BY price_usd"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(plan_from_row).collect())
}

/// Fetch a plan by ID.
pub async fn get_plan(pool: &PgPool, plan_id: &str) -> Result<Plan, BillingError> {
    let row = sqlx::query_as::<_, PlanRow>(&format!(
        "SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1::uuid"
    ))
    .bind(plan_id)
    .fetch_optional(pool)
    .await?
    .ok_or(BillingError::PlanNotFound)?;
    Ok(plan_from_row(row))
}

type SubscriptionRow = (
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
    bool,
    DateTime<Utc>,
);

fn subscription_from_row(row: SubscriptionRow) -> Subscription {
    let (
        id,
        tenant_id,
        plan_id,
        status,
        current_period_start,
        current_period_end,
        trial_end,
        cancel_at_period_end,
        created_at,
    ) = row;
    Subscription {
        id,
        tenant_id,
        plan_id,
        status: status.parse().unwrap_or(SubscriptionStatus::Trialing),
        current_period_start,
        current_period_end,
        trial_end,
        cancel_at_period_end,
        created_at,
    }
}

const SUBSCRIPTION_COLUMNS: &str = "id::text, tenant_id::text, plan_id::text, status, \
     current_period_start, current_period_end, trial_end, cancel_at_period_end, created_at";

/// Fetch the tenant's subscription.
pub async fn get_subscription(
    pool: &PgPool,
    tenant_id: &str,
) -> Result<Option<Subscription>, BillingError> {
    let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
        "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE tenant_id = $1::uuid"
    ))
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(subscription_from_row))
}

/// Create a trialing subscription for a tenant. Fails with
/// `SubscriptionExists` if one is already present (one per tenant).
pub async fn create_subscription(
    executor: impl PgExecutor<'_>,
    tenant_id: &str,
    plan_id: &str,
    trial_days: i64,
) -> Result<Subscription, BillingError> {
    let now = Utc::now();
    let trial_end = now + Duration::days(trial_days);
    let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
        "INSERT INTO subscriptions \
           (tenant_id, plan_id, status, current_period_start, current_period_end, trial_end) \
         VALUES ($1::uuid, $2::uuid, 'trialing', $3, $4, $4) \
         ON CONFLICT (tenant_id) DO NOTHING \
         RETURNING {SUBSCRIPTION_COLUMNS}"
    ))
    .bind(tenant_id)
    .bind(plan_id)
    .bind(now)
    .bind(trial_end)
    .fetch_optional(executor)
    .await?
    .ok_or(BillingError::SubscriptionExists)?;
    Ok(subscription_from_row(row))
}

/// Cancel a subscription. Terminal; no reactivation path.
pub async fn cancel_subscription(pool: &PgPool, tenant_id: &str) -> Result<(), BillingError> {
    let result = sqlx::query(
        "UPDATE subscriptions \
         SET status = 'cancelled', cancel_at_period_end = TRUE, updated_at = NOW() \
         WHERE tenant_id = $1::uuid",
    )
    .bind(tenant_id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(BillingError::SubscriptionNotFound);
    }
    Ok(())
}

/// Activate a subscription and start a fresh billing period of
/// `period_days` from now. Used by the payment webhook for both first
/// activation and renewal.
pub async fn activate_subscription(
    executor: impl PgExecutor<'_>,
    subscription_id: &str,
    period_days: i64,
) -> Result<(), BillingError> {
    let now = Utc::now();
    sqlx::query(
        "UPDATE subscriptions \
         SET status = 'active', current_period_start = $2, current_period_end = $3, \
             updated_at = NOW() \
         WHERE id = $1::uuid",
    )
    .bind(subscription_id)
    .bind(now)
    .bind(now + Duration::days(period_days))
    .execute(executor)
    .await?;
    Ok(())
}

type PaymentRow = (
    String,
    String,
    i64,
    String,
    String,
    String,
    String,
    Option<DateTime<Utc>>,
    DateTime<Utc>,
);

fn payment_from_row(row: PaymentRow) -> Payment {
    let (id, subscription_id, amount, currency, status, paystack_reference, payment_method, paid_at, created_at) =
        row;
    Payment {
        id,
        subscription_id,
        amount,
        currency,
        status: status.parse().unwrap_or(PaymentStatus::Pending),
        paystack_reference,
        payment_method,
        paid_at,
        created_at,
    }
}

/// Record a pending payment at checkout initiation.
pub async fn insert_payment(
    pool: &PgPool,
    subscription_id: &str,
    amount: i64,
    currency: &str,
    reference: &str,
    access_code: &str,
) -> Result<String, BillingError> {
    let id = uuidv7().to_string();
    sqlx::query(
        "INSERT INTO payments \
           (id, subscription_id, amount, currency, paystack_reference, paystack_access_code) \
         VALUES ($1::uuid, $2::uuid, $3, $4, $5, $6)",
    )
    .bind(&id)
    .bind(subscription_id)
    .bind(amount)
    .bind(currency)
    .bind(reference)
    .bind(access_code)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Payment history for a tenant, newest first.
pub async fn list_payments(pool: &PgPool, tenant_id: &str) -> Result<Vec<Payment>, BillingError> {
    let rows = sqlx::query_as::<_, PaymentRow>(
        "SELECT p.id::text, p.subscription_id::text, p.amount, p.currency, p.status, \
                p.paystack_reference, p.payment_method, p.paid_at, p.created_at \
         FROM payments p \
         JOIN subscriptions s ON s.id = p.subscription_id \
         WHERE s.tenant_id = $1::uuid \
         ORDER BY p.created_at DESC",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(payment_from_row).collect())
}

/// Look up a payment's subscription by gateway reference.
pub async fn find_payment_by_reference(
    pool: &PgPool,
    reference: &str,
) -> Result<Option<(String, String)>, BillingError> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT id::text, subscription_id::text FROM payments WHERE paystack_reference = $1",
    )
    .bind(reference)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Settle an unsettled payment as successful. The status guard makes the
/// transition idempotent under duplicate webhook delivery: only the first
/// delivery affects a row.
pub async fn settle_payment_success(
    executor: impl PgExecutor<'_>,
    reference: &str,
    payment_method: &str,
) -> Result<bool, BillingError> {
    let result = sqlx::query(
        "UPDATE payments \
         SET status = 'success', paid_at = NOW(), payment_method = $2 \
         WHERE paystack_reference = $1 AND status IN ('pending', 'processing')",
    )
    .bind(reference)
    .bind(payment_method)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Mirror a subscription status onto the owning tenant's summary column.
pub async fn mirror_tenant_status(
    executor: impl PgExecutor<'_>,
    subscription_id: &str,
    status: &str,
) -> Result<(), BillingError> {
    sqlx::query(
        "UPDATE tenants SET subscription_status = $2 \
         FROM subscriptions s \
         WHERE s.id = $1::uuid AND tenants.id = s.tenant_id",
    )
    .bind(subscription_id)
    .bind(status)
    .execute(executor)
    .await?;
    Ok(())
}

/// Billing cycle of the plan backing a subscription.
pub async fn subscription_billing_cycle(
    pool: &PgPool,
    subscription_id: &str,
) -> Result<BillingCycle, BillingError> {
    let cycle = sqlx::query_scalar::<_, String>(
        "SELECT p.billing_cycle FROM plans p \
         JOIN subscriptions s ON s.plan_id = p.id \
         WHERE s.id = $1::uuid",
    )
    .bind(subscription_id)
    .fetch_one(pool)
    .await?;
    Ok(cycle.parse().unwrap_or(BillingCycle::Monthly))
}
