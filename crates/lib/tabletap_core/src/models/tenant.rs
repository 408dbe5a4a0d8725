//! Tenant domain model.

use serde::{Deserialize, Serialize};

/// A tenant — one isolated restaurant account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    /// Unique partition label (`tenant_<8 hex>`), embedded in SSO claims.
    pub schema_name: String,
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub business_type: String,
    pub currency: String,
    pub timezone: String,
    pub is_active: bool,
    /// Coarse billing summary mirrored from the subscription.
    pub subscription_status: String,
    pub trial_end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
