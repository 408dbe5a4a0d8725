//! Tool catalog and access grant handlers.

use axum::extract::State;
use axum::{Extension, Json};

use tabletap_core::models::sso::{Tool, ToolAccess};
use tabletap_core::sso::queries;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{GrantAccessRequest, StatusResponse};

/// `GET /api/tools` — active tools.
pub async fn list_tools_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Tool>>> {
    Ok(Json(queries::list_tools(&state.pool).await?))
}

/// `GET /api/tools/access` — the caller's grants.
pub async fn list_access_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<ToolAccess>>> {
    Ok(Json(queries::list_tool_access(&state.pool, &claims.sub).await?))
}

/// `POST /api/tools/access` — grant or revoke a user's access to a tool.
pub async fn grant_access_handler(
    State(state): State<AppState>,
    Json(body): Json<GrantAccessRequest>,
) -> AppResult<Json<StatusResponse>> {
    queries::upsert_tool_access(&state.pool, &body.user_id, &body.tool_id, body.is_granted)
        .await?;
    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}
