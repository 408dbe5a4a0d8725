//! Authentication request handlers.

use axum::extract::State;
use axum::{Extension, Json};

use tabletap_core::auth::queries;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{LoginRequest, ProfileResponse, RegisterRequest, TokenResponse, UserResponse};
use crate::services::auth;

/// `POST /api/auth/register` — create an account and its tenant.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::register(
        &state.pool,
        &body.email,
        &body.password,
        body.name.as_deref(),
        body.restaurant_name.as_deref(),
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /api/auth/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(
        &state.pool,
        &body.email,
        &body.password,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    Ok(Json(resp))
}

/// `GET /api/auth/profile` — the caller's identity and tenant context.
pub async fn profile_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<ProfileResponse>> {
    let user = queries::get_user_by_id(&state.pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(ProfileResponse {
        user: UserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
        },
        tenant_id: claims.tenant_id,
        tenant_schema: claims.tenant_schema,
    }))
}
