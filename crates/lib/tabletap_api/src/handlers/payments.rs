//! Payment checkout and history handlers.

use axum::extract::State;
use axum::{Extension, Json};
use tracing::info;

use tabletap_core::billing::paystack::{PaystackClient, generate_reference};
use tabletap_core::billing::{BillingError, queries};
use tabletap_core::models::billing::Payment;
use tabletap_core::tenants;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::InitializePaymentResponse;

/// `POST /api/payments/initialize` — start a checkout for the tenant's
/// current plan. The payment row is created pending; the webhook settles
/// it.
pub async fn initialize_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<InitializePaymentResponse>> {
    let subscription = queries::get_subscription(&state.pool, &claims.tenant_id)
        .await?
        .ok_or(BillingError::SubscriptionNotFound)?;
    let plan = queries::get_plan(&state.pool, &subscription.plan_id).await?;
    let tenant = tenants::get_tenant(&state.pool, &claims.tenant_id).await?;

    let amount = plan.price_in(&tenant.currency);
    let reference = generate_reference();

    let client = PaystackClient::new(state.config.paystack_secret_key.clone());
    let session = client
        .initialize_transaction(&claims.email, amount, &tenant.currency, &reference)
        .await?;

    queries::insert_payment(
        &state.pool,
        &subscription.id,
        amount,
        &tenant.currency,
        &session.reference,
        &session.access_code,
    )
    .await?;

    info!(reference = %session.reference, amount, "initialized checkout");
    Ok(Json(InitializePaymentResponse {
        authorization_url: session.authorization_url,
        access_code: session.access_code,
        reference: session.reference,
        amount,
        currency: tenant.currency,
    }))
}

/// `GET /api/payments` — the tenant's payment history, newest first.
pub async fn list_payments_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<Payment>>> {
    Ok(Json(queries::list_payments(&state.pool, &claims.tenant_id).await?))
}
