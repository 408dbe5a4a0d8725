//! Staff domain models.

use serde::{Deserialize, Serialize};

/// A named staff role with a free-form permission map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: serde_json::Value,
}

/// A staff member within a tenant. One membership per (tenant, user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub tenant_id: String,
    pub user_id: String,
    pub role_id: String,
    pub is_active: bool,
    pub employee_id: String,
    pub department: String,
    pub hired_date: chrono::DateTime<chrono::Utc>,
}
