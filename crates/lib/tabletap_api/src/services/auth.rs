//! Authentication flows: registration (with tenant provisioning) and login.

use sqlx::PgPool;
use tracing::info;

use tabletap_core::auth::jwt::{ACCESS_TOKEN_EXPIRY_SECS, generate_access_token};
use tabletap_core::auth::password::{hash_password, verify_password};
use tabletap_core::auth::{AuthError, queries};
use tabletap_core::billing;
use tabletap_core::tenants;

use crate::error::AppError;
use crate::models::{TokenResponse, UserResponse};

/// Register a new account: create the user, provision their tenant with a
/// 7-day trial, start a trialing subscription on the cheapest active plan,
/// and return an access token.
pub async fn register(
    pool: &PgPool,
    email: &str,
    password: &str,
    name: Option<&str>,
    restaurant_name: Option<&str>,
    jwt_secret: &[u8],
) -> Result<TokenResponse, AppError> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(AuthError::ValidationError("Invalid email address".into()).into());
    }
    if password.len() < 8 {
        return Err(
            AuthError::ValidationError("Password must be at least 8 characters".into()).into(),
        );
    }
    if queries::email_exists(pool, &email).await? {
        return Err(AuthError::ValidationError("Email already registered".into()).into());
    }

    let password_hash = hash_password(password)?;
    let restaurant_name = restaurant_name
        .or(name)
        .map(str::to_string)
        .unwrap_or_else(|| {
            email
                .split('@')
                .next()
                .unwrap_or("restaurant")
                .to_string()
        });
    let plans = billing::queries::list_plans(pool).await?;

    // User, tenant, and trial subscription land together or not at all:
    // a user row without a tenant can neither log in nor re-register.
    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let user_id = queries::create_user(&mut *tx, &email, name, &password_hash).await?;
    let tenant = tenants::provision_tenant(&mut *tx, &user_id, &restaurant_name, &email).await?;

    // Start the trial on the cheapest active plan. A bare install with no
    // plans seeded still registers fine; the subscription comes later via
    // POST /api/subscription.
    if let Some(plan) = plans.first() {
        billing::queries::create_subscription(&mut *tx, &tenant.id, &plan.id, tenants::TRIAL_DAYS)
            .await?;
    }
    tx.commit().await.map_err(AppError::from)?;

    info!(%user_id, tenant_id = %tenant.id, "registered new account");
    let access_token =
        generate_access_token(&user_id, &email, &tenant.id, &tenant.schema_name, jwt_secret)?;
    Ok(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRY_SECS,
        user: UserResponse {
            id: user_id,
            email,
            name: name.map(str::to_string),
        },
    })
}

/// Authenticate with email + password and return an access token.
pub async fn login(
    pool: &PgPool,
    email: &str,
    password: &str,
    jwt_secret: &[u8],
) -> Result<TokenResponse, AppError> {
    let email = email.trim().to_lowercase();
    let (user_id, name, password_hash) = queries::find_user_by_email(pool, &email)
        .await?
        .ok_or(AuthError::CredentialError)?;
    let password_hash = password_hash.ok_or(AuthError::CredentialError)?;
    if !verify_password(password, &password_hash)? {
        return Err(AuthError::CredentialError.into());
    }

    let tenant = tenants::get_tenant_by_owner(pool, &user_id).await?;
    let access_token =
        generate_access_token(&user_id, &email, &tenant.id, &tenant.schema_name, jwt_secret)?;
    Ok(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRY_SECS,
        user: UserResponse {
            id: user_id,
            email,
            name,
        },
    })
}
