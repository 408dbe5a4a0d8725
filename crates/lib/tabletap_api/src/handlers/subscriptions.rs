//! Plan and subscription handlers.

use axum::extract::State;
use axum::{Extension, Json};

use tabletap_core::billing::{BillingError, queries};
use tabletap_core::models::billing::{Plan, Subscription};
use tabletap_core::tenants;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreateSubscriptionRequest, StatusResponse};

/// `GET /api/plans` — active plans. Public: shown on the pricing page.
pub async fn list_plans_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Plan>>> {
    Ok(Json(queries::list_plans(&state.pool).await?))
}

/// `GET /api/subscription` — the caller's tenant subscription.
pub async fn get_subscription_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<Subscription>> {
    let subscription = queries::get_subscription(&state.pool, &claims.tenant_id)
        .await?
        .ok_or(BillingError::SubscriptionNotFound)?;
    Ok(Json(subscription))
}

/// `POST /api/subscription` — start a trialing subscription on a plan.
pub async fn create_subscription_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Json(body): Json<CreateSubscriptionRequest>,
) -> AppResult<Json<Subscription>> {
    // Plan must exist before we touch the subscription row.
    queries::get_plan(&state.pool, &body.plan_id).await?;
    let subscription = queries::create_subscription(
        &state.pool,
        &claims.tenant_id,
        &body.plan_id,
        tenants::TRIAL_DAYS,
    )
    .await?;
    Ok(Json(subscription))
}

/// `POST /api/subscription/cancel` — cancel the tenant's subscription.
pub async fn cancel_subscription_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<StatusResponse>> {
    queries::cancel_subscription(&state.pool, &claims.tenant_id).await?;
    tenants::set_subscription_status(&state.pool, &claims.tenant_id, "cancelled").await?;
    Ok(Json(StatusResponse {
        status: "cancelled".to_string(),
    }))
}
