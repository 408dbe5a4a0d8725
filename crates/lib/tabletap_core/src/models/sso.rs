//! SSO domain models: tools, access grants, one-shot tokens.

use serde::{Deserialize, Serialize};

/// An external tool users can single-sign-on into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub is_active: bool,
}

/// Per-user access grant for a tool. At most one per (user, tool).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolAccess {
    pub id: String,
    pub user_id: String,
    pub tool_id: String,
    pub tool_name: String,
    pub is_granted: bool,
    pub granted_at: chrono::DateTime<chrono::Utc>,
}

/// Claims signed into an SSO token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsoClaims {
    pub user_id: String,
    pub tool_id: String,
    pub tenant_schema: String,
    /// Expiry (unix timestamp) — absolute wall clock, issued-at + 1 hour.
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// Persisted SSO token row. Rows are never deleted; `consumed` flips to
/// true exactly once and the row stays behind for audit.
#[derive(Debug, Clone)]
pub struct SsoTokenRecord {
    pub id: String,
    pub user_id: String,
    pub tool_id: String,
    pub tenant_schema: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub consumed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Identity returned by a successful one-shot verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedSso {
    pub user_id: String,
    pub tool_id: String,
    pub tenant_schema: String,
}
