//! Staff roles and membership, tenant-scoped.

use sqlx::PgPool;
use thiserror::Error;

use crate::models::staff::{Role, StaffMember};

#[derive(Debug, Error)]
pub enum StaffError {
    #[error("Staff member not found")]
    NotFound,

    #[error("Staff member already exists for this user")]
    AlreadyExists,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// List all roles.
pub async fn list_roles(pool: &PgPool) -> Result<Vec<Role>, StaffError> {
    let rows = sqlx::query_as::<_, (String, String, String, serde_json::Value)>(
        "SELECT id::text, name, description, permissions FROM roles ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(id, name, description, permissions)| Role {
            id,
            name,
            description,
            permissions,
        })
        .collect())
}

/// Create a role.
pub async fn create_role(
    pool: &PgPool,
    name: &str,
    description: &str,
    permissions: &serde_json::Value,
) -> Result<Role, StaffError> {
    if name.trim().is_empty() {
        return Err(StaffError::ValidationError("Role name is required".into()));
    }
    let id = sqlx::query_scalar::<_, String>(
        "INSERT INTO roles (name, description, permissions) \
         VALUES ($1, $2, $3) RETURNING id::text",
    )
    .bind(name)
    .bind(description)
    .bind(permissions)
    .fetch_one(pool)
    .await?;
    Ok(Role {
        id,
        name: name.to_string(),
        description: description.to_string(),
        permissions: permissions.clone(),
    })
}

type StaffRow = (
    String,
    String,
    String,
    bool,
    String,
    String,
    chrono::DateTime<chrono::Utc>,
);

fn staff_from_row(tenant_id: &str, row: StaffRow) -> StaffMember {
    let (id, user_id, role_id, is_active, employee_id, department, hired_date) = row;
    StaffMember {
        id,
        tenant_id: tenant_id.to_string(),
        user_id,
        role_id,
        is_active,
        employee_id,
        department,
        hired_date,
    }
}

/// List staff for a tenant, newest hires first.
pub async fn list_staff(pool: &PgPool, tenant_id: &str) -> Result<Vec<StaffMember>, StaffError> {
    let rows = sqlx::query_as::<_, StaffRow>(
        "SELECT id::text, user_id::text, role_id::text, is_active, employee_id, department, hired_date \
         FROM staff_members WHERE tenant_id = $1::uuid ORDER BY hired_date DESC",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|row| staff_from_row(tenant_id, row))
        .collect())
}

/// Add a staff member. One membership per (tenant, user).
pub async fn create_staff(
    pool: &PgPool,
    tenant_id: &str,
    user_id: &str,
    role_id: &str,
    employee_id: &str,
    department: &str,
) -> Result<StaffMember, StaffError> {
    let row = sqlx::query_as::<_, StaffRow>(
        "INSERT INTO staff_members (tenant_id, user_id, role_id, employee_id, department) \
         VALUES ($1::uuid, $2::uuid, $3::uuid, $4, $5) \
         ON CONFLICT (tenant_id, user_id) DO NOTHING \
         RETURNING id::text, user_id::text, role_id::text, is_active, employee_id, department, hired_date",
    )
    .bind(tenant_id)
    .bind(user_id)
    .bind(role_id)
    .bind(employee_id)
    .bind(department)
    .fetch_optional(pool)
    .await?
    .ok_or(StaffError::AlreadyExists)?;
    Ok(staff_from_row(tenant_id, row))
}

/// Flip a staff member's active flag. Tenant-scoped so one tenant cannot
/// touch another's staff.
pub async fn set_staff_active(
    pool: &PgPool,
    tenant_id: &str,
    staff_id: &str,
    is_active: bool,
) -> Result<(), StaffError> {
    let result = sqlx::query(
        "UPDATE staff_members SET is_active = $3 \
         WHERE id = $1::uuid AND tenant_id = $2::uuid",
    )
    .bind(staff_id)
    .bind(tenant_id)
    .bind(is_active)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(StaffError::NotFound);
    }
    Ok(())
}
