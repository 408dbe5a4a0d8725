//! SSO token issuance and verification handlers.

use axum::extract::State;
use axum::{Extension, Json};

use tabletap_core::sso;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{GenerateSsoRequest, SsoTokenResponse, VerifySsoRequest, VerifySsoResponse};

/// `POST /api/sso/generate` — mint a one-shot token for a tool the caller
/// has been granted.
pub async fn generate_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Json(body): Json<GenerateSsoRequest>,
) -> AppResult<Json<SsoTokenResponse>> {
    let issued = sso::issue_token(
        &state.pool,
        &claims.sub,
        &body.tool_id,
        &claims.tenant_schema,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    Ok(Json(SsoTokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        created_at: issued.created_at,
    }))
}

/// `POST /api/sso/verify` — consume a one-shot token. Public: called by
/// the destination tool, not by a logged-in user.
pub async fn verify_handler(
    State(state): State<AppState>,
    Json(body): Json<VerifySsoRequest>,
) -> AppResult<Json<VerifySsoResponse>> {
    let verified = sso::verify_token(
        &state.pool,
        &body.token,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    Ok(Json(VerifySsoResponse {
        valid: true,
        user_id: verified.user_id,
        tool_id: verified.tool_id,
        tenant_schema: verified.tenant_schema,
    }))
}
