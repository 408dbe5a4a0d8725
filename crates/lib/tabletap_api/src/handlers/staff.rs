//! Staff role and membership handlers.

use axum::extract::{Path, State};
use axum::{Extension, Json};

use tabletap_core::models::staff::{Role, StaffMember};
use tabletap_core::staff;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreateRoleRequest, CreateStaffRequest, StatusResponse};

/// `GET /api/staff/roles` — all roles.
pub async fn list_roles_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(staff::list_roles(&state.pool).await?))
}

/// `POST /api/staff/roles` — create a role.
pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateRoleRequest>,
) -> AppResult<Json<Role>> {
    Ok(Json(
        staff::create_role(&state.pool, &body.name, &body.description, &body.permissions).await?,
    ))
}

/// `GET /api/staff` — the tenant's staff.
pub async fn list_staff_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<StaffMember>>> {
    Ok(Json(staff::list_staff(&state.pool, &claims.tenant_id).await?))
}

/// `POST /api/staff` — add a staff member.
pub async fn create_staff_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Json(body): Json<CreateStaffRequest>,
) -> AppResult<Json<StaffMember>> {
    Ok(Json(
        staff::create_staff(
            &state.pool,
            &claims.tenant_id,
            &body.user_id,
            &body.role_id,
            &body.employee_id,
            &body.department,
        )
        .await?,
    ))
}

/// `POST /api/staff/{id}/activate`.
pub async fn activate_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(staff_id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    staff::set_staff_active(&state.pool, &claims.tenant_id, &staff_id, true).await?;
    Ok(Json(StatusResponse {
        status: "active".to_string(),
    }))
}

/// `POST /api/staff/{id}/deactivate`.
pub async fn deactivate_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(staff_id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    staff::set_staff_active(&state.pool, &claims.tenant_id, &staff_id, false).await?;
    Ok(Json(StatusResponse {
        status: "inactive".to_string(),
    }))
}
