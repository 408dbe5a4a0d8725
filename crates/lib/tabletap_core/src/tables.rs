//! Restaurant tables and QR menu links, tenant-scoped.

use sqlx::PgPool;
use thiserror::Error;

use crate::models::table::{Table, qr_code_url};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table not found")]
    NotFound,

    #[error("Table number already exists")]
    DuplicateNumber,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

type TableRow = (
    String,
    i32,
    String,
    String,
    Option<i32>,
    String,
    String,
    Option<chrono::DateTime<chrono::Utc>>,
    chrono::DateTime<chrono::Utc>,
);

fn table_from_row(tenant_id: &str, row: TableRow) -> Table {
    let (id, number, name, section, capacity, status, qr_code_url, qr_generated_at, created_at) =
        row;
    Table {
        id,
        tenant_id: tenant_id.to_string(),
        number,
        name,
        section,
        capacity,
        status,
        qr_code_url,
        qr_generated_at,
        created_at,
    }
}

const TABLE_COLUMNS: &str = "id::text, number, name, section, capacity, status, qr_code_url, \
     qr_generated_at, created_at";

/// List a tenant's tables by number.
pub async fn list_tables(pool: &PgPool, tenant_id: &str) -> Result<Vec<Table>, TableError> {
    let rows = sqlx::query_as::<_, TableRow>(&format!(
        "SELECT {TABLE_COLUMNS} FROM restaurant_tables \
         WHERE tenant_id = $1::uuid ORDER BY number"
    ))
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|row| table_from_row(tenant_id, row))
        .collect())
}

/// Create a table with its QR URL precomputed.
pub async fn create_table(
    pool: &PgPool,
    tenant_id: &str,
    restaurant_slug: &str,
    number: i32,
    name: &str,
    section: &str,
    capacity: Option<i32>,
) -> Result<Table, TableError> {
    if number < 1 {
        return Err(TableError::ValidationError(
            "Table number must be positive".into(),
        ));
    }
    let url = qr_code_url(restaurant_slug, number);
    let row = sqlx::query_as::<_, TableRow>(&format!(
        "INSERT INTO restaurant_tables \
           (tenant_id, number, name, section, capacity, qr_code_url, qr_generated_at) \
         VALUES ($1::uuid, $2, $3, $4, $5, $6, NOW()) \
         ON CONFLICT (tenant_id, number) DO NOTHING \
         RETURNING {TABLE_COLUMNS}"
    ))
    .bind(tenant_id)
    .bind(number)
    .bind(name)
    .bind(section)
    .bind(capacity)
    .bind(&url)
    .fetch_optional(pool)
    .await?
    .ok_or(TableError::DuplicateNumber)?;
    Ok(table_from_row(tenant_id, row))
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct TableUpdate {
    pub name: Option<String>,
    pub section: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<String>,
}

/// Apply a partial update and return the fresh row.
pub async fn update_table(
    pool: &PgPool,
    tenant_id: &str,
    table_id: &str,
    update: &TableUpdate,
) -> Result<Table, TableError> {
    if let Some(status) = &update.status
        && status != "active"
        && status != "inactive"
    {
        return Err(TableError::ValidationError(format!(
            "Unknown table status: {status}"
        )));
    }
    let row = sqlx::query_as::<_, TableRow>(&format!(
        "UPDATE restaurant_tables SET \
           name       = COALESCE($3, name), \
           section    = COALESCE($4, section), \
           capacity   = COALESCE($5, capacity), \
           status     = COALESCE($6, status), \
           updated_at = NOW() \
         WHERE id = $1::uuid AND tenant_id = $2::uuid \
         RETURNING {TABLE_COLUMNS}"
    ))
    .bind(table_id)
    .bind(tenant_id)
    .bind(&update.name)
    .bind(&update.section)
    .bind(update.capacity)
    .bind(&update.status)
    .fetch_optional(pool)
    .await?
    .ok_or(TableError::NotFound)?;
    Ok(table_from_row(tenant_id, row))
}

/// Create a contiguous range of tables atomically. The whole range either
/// lands or nothing does; an existing number in the range aborts it.
pub async fn create_tables_bulk(
    pool: &PgPool,
    tenant_id: &str,
    restaurant_slug: &str,
    from_table: i32,
    to_table: i32,
) -> Result<Vec<Table>, TableError> {
    if from_table < 1 || to_table < from_table {
        return Err(TableError::ValidationError(
            "Invalid table range".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;
    let mut created = Vec::with_capacity((to_table - from_table + 1) as usize);
    for number in from_table..=to_table {
        let url = qr_code_url(restaurant_slug, number);
        let row = sqlx::query_as::<_, TableRow>(&format!(
            "INSERT INTO restaurant_tables \
               (tenant_id, number, qr_code_url, qr_generated_at) \
             VALUES ($1::uuid, $2, $3, NOW()) \
             ON CONFLICT (tenant_id, number) DO NOTHING \
             RETURNING {TABLE_COLUMNS}"
        ))
        .bind(tenant_id)
        .bind(number)
        .bind(&url)
        .fetch_optional(&mut *tx)
        .await?;
        match row {
            Some(row) => created.push(table_from_row(tenant_id, row)),
            None => return Err(TableError::DuplicateNumber),
        }
    }
    tx.commit().await?;
    Ok(created)
}

/// Active tables with QR URLs, backfilling any rows created before QR
/// generation existed.
pub async fn qr_batch(
    pool: &PgPool,
    tenant_id: &str,
    restaurant_slug: &str,
) -> Result<Vec<Table>, TableError> {
    sqlx::query(
        "UPDATE restaurant_tables \
         SET qr_code_url = $2 || number::text, qr_generated_at = NOW() \
         WHERE tenant_id = $1::uuid AND status = 'active' AND qr_code_url = ''",
    )
    .bind(tenant_id)
    .bind(format!("https://menu.tabletap.space/{restaurant_slug}/"))
    .execute(pool)
    .await?;

    let rows = sqlx::query_as::<_, TableRow>(&format!(
        "SELECT {TABLE_COLUMNS} FROM restaurant_tables \
         WHERE tenant_id = $1::uuid AND status = 'active' ORDER BY number"
    ))
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|row| table_from_row(tenant_id, row))
        .collect())
}
