//! Tenant settings handlers.

use axum::extract::State;
use axum::{Extension, Json};

use tabletap_core::models::tenant::Tenant;
use tabletap_core::tenants::{self, TenantUpdate};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::UpdateTenantRequest;

/// `GET /api/tenant` — the caller's tenant.
pub async fn get_tenant_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<Tenant>> {
    Ok(Json(tenants::get_tenant(&state.pool, &claims.tenant_id).await?))
}

/// `PATCH /api/tenant` — partial update of tenant settings.
pub async fn update_tenant_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateTenantRequest>,
) -> AppResult<Json<Tenant>> {
    let update = TenantUpdate {
        name: body.name,
        description: body.description,
        contact_email: body.contact_email,
        contact_phone: body.contact_phone,
        business_type: body.business_type,
        currency: body.currency,
        timezone: body.timezone,
    };
    Ok(Json(
        tenants::update_tenant(&state.pool, &claims.tenant_id, &update).await?,
    ))
}
