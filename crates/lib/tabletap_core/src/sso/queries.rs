//! SSO database queries: tools, access grants, and token rows.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::SsoError;
use crate::models::sso::{SsoTokenRecord, Tool, ToolAccess};
use crate::uuid::uuidv7;

/// List active tools.
pub async fn list_tools(pool: &PgPool) -> Result<Vec<Tool>, SsoError> {
    let rows = sqlx::query_as::<_, (String, String, String, String, bool)>(
        "SELECT id::text, name, description, url, is_active \
         FROM tools WHERE is_active = TRUE ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(id, name, description, url, is_active)| Tool {
            id,
            name,
            description,
            url,
            is_active,
        })
        .collect())
}

/// Whether the user holds a granted access row for the tool.
pub async fn has_tool_access(
    pool: &PgPool,
    user_id: &str,
    tool_id: &str,
) -> Result<bool, SsoError> {
    let granted = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM tool_access \
         WHERE user_id = $1::uuid AND tool_id = $2::uuid AND is_granted = TRUE)",
    )
    .bind(user_id)
    .bind(tool_id)
    .fetch_one(pool)
    .await?;
    Ok(granted)
}

/// List the user's access grants.
pub async fn list_tool_access(pool: &PgPool, user_id: &str) -> Result<Vec<ToolAccess>, SsoError> {
    let rows = sqlx::query_as::<_, (String, String, String, bool, DateTime<Utc>)>(
        "SELECT ta.id::text, ta.tool_id::text, t.name, ta.is_granted, ta.granted_at \
         FROM tool_access ta JOIN tools t ON t.id = ta.tool_id \
         WHERE ta.user_id = $1::uuid ORDER BY t.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(id, tool_id, tool_name, is_granted, granted_at)| ToolAccess {
            id,
            user_id: user_id.to_string(),
            tool_id,
            tool_name,
            is_granted,
            granted_at,
        })
        .collect())
}

/// Grant or update access for (user, tool). Upsert on the unique pair.
pub async fn upsert_tool_access(
    pool: &PgPool,
    user_id: &str,
    tool_id: &str,
    is_granted: bool,
) -> Result<(), SsoError> {
    sqlx::query(
        "INSERT INTO tool_access (user_id, tool_id, is_granted) \
         VALUES ($1::uuid, $2::uuid, $3) \
         ON CONFLICT (user_id, tool_id) \
         DO UPDATE SET is_granted = EXCLUDED.is_granted, granted_at = NOW()",
    )
    .bind(user_id)
    .bind(tool_id)
    .bind(is_granted)
    .execute(pool)
    .await?;
    Ok(())
}

/// Persist a freshly issued token row.
pub async fn insert_token(
    pool: &PgPool,
    token: &str,
    token_hash: &str,
    user_id: &str,
    tool_id: &str,
    tenant_schema: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), SsoError> {
    sqlx::query(
        "INSERT INTO sso_tokens (id, token, token_hash, user_id, tool_id, tenant_schema, expires_at) \
         VALUES ($1::uuid, $2, $3, $4::uuid, $5::uuid, $6, $7)",
    )
    .bind(uuidv7().to_string())
    .bind(token)
    .bind(token_hash)
    .bind(user_id)
    .bind(tool_id)
    .bind(tenant_schema)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Look up a token row by hash.
pub async fn find_token(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<SsoTokenRecord>, SsoError> {
    let row = sqlx::query_as::<_, (String, String, String, String, DateTime<Utc>, bool, DateTime<Utc>)>(
        "SELECT id::text, user_id::text, tool_id::text, tenant_schema, expires_at, consumed, created_at \
         FROM sso_tokens WHERE token_hash = $1",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(
        |(id, user_id, tool_id, tenant_schema, expires_at, consumed, created_at)| SsoTokenRecord {
            id,
            user_id,
            tool_id,
            tenant_schema,
            expires_at,
            consumed,
            created_at,
        },
    ))
}

/// Atomically consume an unexpired, unconsumed token. Returns `true` iff
/// this caller flipped the flag.
pub async fn consume_token(pool: &PgPool, token_hash: &str) -> Result<bool, SsoError> {
    let result = sqlx::query(
        "UPDATE sso_tokens SET consumed = TRUE \
         WHERE token_hash = $1 AND consumed = FALSE AND expires_at > NOW()",
    )
    .bind(token_hash)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}
