//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// Domain user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

/// JWT claims embedded in access tokens.
///
/// The tenant context rides in the claims so every authenticated request
/// carries it explicitly — there is no ambient per-thread tenant state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — user ID (standard JWT `sub` claim).
    pub sub: String,
    /// User email.
    pub email: String,
    /// Tenant ID the user belongs to.
    pub tenant_id: String,
    /// Tenant schema label (e.g. `tenant_3fa85f64`).
    pub tenant_schema: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}
