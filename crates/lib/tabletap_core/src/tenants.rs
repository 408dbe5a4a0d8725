//! Tenant provisioning and settings.

use rand::Rng;
use rand::rng;
use sqlx::{PgExecutor, PgPool};
use thiserror::Error;
use tracing::info;

use crate::models::tenant::Tenant;

/// Trial length granted at sign-up.
pub const TRIAL_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum TenantError {
    #[error("Tenant not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// Generate a partition label: `tenant_` + 8 lowercase hex chars.
pub fn generate_schema_name() -> String {
    let bytes: [u8; 4] = rng().random();
    format!("tenant_{}", hex::encode(bytes))
}

type TenantRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    bool,
    String,
    Option<chrono::DateTime<chrono::Utc>>,
    chrono::DateTime<chrono::Utc>,
);

fn tenant_from_row(row: TenantRow) -> Tenant {
    let (
        id,
        schema_name,
        name,
        description,
        contact_email,
        contact_phone,
        business_type,
        currency,
        timezone,
        is_active,
        subscription_status,
        trial_end_date,
        created_at,
    ) = row;
    Tenant {
        id,
        schema_name,
        name,
        description,
        contact_email,
        contact_phone,
        business_type,
        currency,
        timezone,
        is_active,
        subscription_status,
        trial_end_date,
        created_at,
    }
}

const TENANT_COLUMNS: &str = "id::text, schema_name, name, description, contact_email, \
     contact_phone, business_type, currency, timezone, is_active, subscription_status, \
     trial_end_date, created_at";

/// Provision a tenant for a new user: fresh schema label, 7-day trial.
pub async fn provision_tenant(
    executor: impl PgExecutor<'_>,
    owner_user_id: &str,
    name: &str,
    contact_email: &str,
) -> Result<Tenant, TenantError> {
    let schema_name = generate_schema_name();
    let row = sqlx::query_as::<_, TenantRow>(&format!(
        "INSERT INTO tenants \
           (schema_name, name, contact_email, owner_user_id, trial_end_date) \
         VALUES ($1, $2, $3, $4::uuid, NOW() + make_interval(days => $5)) \
         RETURNING {TENANT_COLUMNS}"
    ))
    .bind(&schema_name)
    .bind(name)
    .bind(contact_email)
    .bind(owner_user_id)
    .bind(TRIAL_DAYS as i32)
    .fetch_one(executor)
    .await?;
    info!(%schema_name, owner_user_id, "provisioned tenant");
    Ok(tenant_from_row(row))
}

/// Fetch the tenant owned by a user. Every registered user owns exactly
/// one tenant.
pub async fn get_tenant_by_owner(pool: &PgPool, owner_user_id: &str) -> Result<Tenant, TenantError> {
    let row = sqlx::query_as::<_, TenantRow>(&format!(
        "SELECT {TENANT_COLUMNS} FROM tenants WHERE owner_user_id = $1::uuid"
    ))
    .bind(owner_user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(TenantError::NotFound)?;
    Ok(tenant_from_row(row))
}

/// Fetch a tenant by ID.
pub async fn get_tenant(pool: &PgPool, tenant_id: &str) -> Result<Tenant, TenantError> {
    let row = sqlx::query_as::<_, TenantRow>(&format!(
        "SELECT {TENANT_COLUMNS} FROM tenants WHERE id = $1::uuid"
    ))
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?
    .ok_or(TenantError::NotFound)?;
    Ok(tenant_from_row(row))
}

/// Partial update of tenant settings. `None` fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct TenantUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub business_type: Option<String>,
    pub currency: Option<String>,
    pub timezone: Option<String>,
}

/// Apply a partial update and return the fresh row.
pub async fn update_tenant(
    pool: &PgPool,
    tenant_id: &str,
    update: &TenantUpdate,
) -> Result<Tenant, TenantError> {
    let row = sqlx::query_as::<_, TenantRow>(&format!(
        "UPDATE tenants SET \
           name          = COALESCE($2, name), \
           description   = COALESCE($3, description), \
           contact_email = COALESCE($4, contact_email), \
           contact_phone = COALESCE($5, contact_phone), \
           business_type = COALESCE($6, business_type), \
           currency      = COALESCE($7, currency), \
           timezone      = COALESCE($8, timezone) \
         WHERE id = $1::uuid \
         RETURNING {TENANT_COLUMNS}"
    ))
    .bind(tenant_id)
    .bind(&update.name)
    .bind(&update.description)
    .bind(&update.contact_email)
    .bind(&update.contact_phone)
    .bind(&update.business_type)
    .bind(&update.currency)
    .bind(&update.timezone)
    .fetch_optional(pool)
    .await?
    .ok_or(TenantError::NotFound)?;
    Ok(tenant_from_row(row))
}

/// Mirror the subscription status onto the tenant summary column.
pub async fn set_subscription_status(
    pool: &PgPool,
    tenant_id: &str,
    status: &str,
) -> Result<(), TenantError> {
    sqlx::query("UPDATE tenants SET subscription_status = $2 WHERE id = $1::uuid")
        .bind(tenant_id)
        .bind(status)
        .execute(pool)
        .await?;
    Ok(())
}
