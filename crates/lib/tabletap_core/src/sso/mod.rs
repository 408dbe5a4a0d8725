//! Single sign-on token issuance and verification.
//!
//! Tokens are signed JWTs handed to third-party tools. Each token is
//! one-shot: verification consumes it, and consumption is permanent.
//! Rows are retained after consumption for audit.

pub mod queries;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::models::sso::{SsoClaims, VerifiedSso};

/// SSO token lifetime: 1 hour.
pub const SSO_TOKEN_EXPIRY_SECS: i64 = 3600;

/// SSO errors.
#[derive(Debug, Error)]
pub enum SsoError {
    #[error("Access denied")]
    AccessDenied,

    #[error("Invalid token")]
    TokenNotFound,

    #[error("Token expired or invalid")]
    TokenExpiredOrConsumed,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// A freshly issued SSO token with its validity window.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Hash a token for storage and lookup. The raw token never touches the
/// database.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Issue a one-shot SSO token for a user and tool.
///
/// Requires an explicit access grant; no grant row or `is_granted=false`
/// both yield `AccessDenied`.
pub async fn issue_token(
    pool: &PgPool,
    user_id: &str,
    tool_id: &str,
    tenant_schema: &str,
    secret: &[u8],
) -> Result<IssuedToken, SsoError> {
    if !queries::has_tool_access(pool, user_id, tool_id).await? {
        return Err(SsoError::AccessDenied);
    }

    let created_at = Utc::now();
    let expires_at = created_at + Duration::seconds(SSO_TOKEN_EXPIRY_SECS);
    let claims = SsoClaims {
        user_id: user_id.to_string(),
        tool_id: tool_id.to_string(),
        tenant_schema: tenant_schema.to_string(),
        iat: created_at.timestamp(),
        exp: expires_at.timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| SsoError::TokenError(format!("jwt encode: {e}")))?;

    queries::insert_token(
        pool,
        &token,
        &hash_token(&token),
        user_id,
        tool_id,
        tenant_schema,
        expires_at,
    )
    .await?;

    info!(user_id, tool_id, "issued SSO token");
    Ok(IssuedToken {
        token,
        expires_at,
        created_at,
    })
}

/// Verify and consume a one-shot SSO token.
///
/// The consume step is a single conditional UPDATE guarded on
/// `consumed = FALSE AND expires_at > now()`, so under concurrent
/// verification at most one caller succeeds.
pub async fn verify_token(
    pool: &PgPool,
    token: &str,
    secret: &[u8],
) -> Result<VerifiedSso, SsoError> {
    let token_hash = hash_token(token);

    let row = queries::find_token(pool, &token_hash)
        .await?
        .ok_or(SsoError::TokenNotFound)?;

    let consumed = queries::consume_token(pool, &token_hash).await?;
    if !consumed {
        return Err(SsoError::TokenExpiredOrConsumed);
    }

    // Signature check after consumption: the hash lookup already binds the
    // token to a row we created, but a secret rotation must still invalidate
    // outstanding tokens.
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<SsoClaims>(token, &key, &validation)
        .map_err(|_| SsoError::TokenExpiredOrConsumed)?;

    info!(user_id = %row.user_id, tool_id = %row.tool_id, "verified SSO token");
    Ok(VerifiedSso {
        user_id: row.user_id,
        tool_id: row.tool_id,
        tenant_schema: row.tenant_schema,
    })
}
