//! Restaurant table handlers.

use axum::extract::{Path, State};
use axum::{Extension, Json};

use tabletap_core::models::table::Table;
use tabletap_core::tables::{self, TableUpdate};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{BulkCreateTablesRequest, CreateTableRequest, UpdateTableRequest};

/// `GET /api/tables` — the tenant's tables by number.
pub async fn list_tables_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<Table>>> {
    Ok(Json(tables::list_tables(&state.pool, &claims.tenant_id).await?))
}

/// `POST /api/tables` — create a table with its QR link.
pub async fn create_table_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Json(body): Json<CreateTableRequest>,
) -> AppResult<Json<Table>> {
    Ok(Json(
        tables::create_table(
            &state.pool,
            &claims.tenant_id,
            &claims.tenant_schema,
            body.number,
            &body.name,
            &body.section,
            body.capacity,
        )
        .await?,
    ))
}

/// `PATCH /api/tables/{id}` — partial update.
pub async fn update_table_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(table_id): Path<String>,
    Json(body): Json<UpdateTableRequest>,
) -> AppResult<Json<Table>> {
    let update = TableUpdate {
        name: body.name,
        section: body.section,
        capacity: body.capacity,
        status: body.status,
    };
    Ok(Json(
        tables::update_table(&state.pool, &claims.tenant_id, &table_id, &update).await?,
    ))
}

/// `POST /api/tables/bulk` — create a contiguous numbered range.
pub async fn bulk_create_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Json(body): Json<BulkCreateTablesRequest>,
) -> AppResult<Json<Vec<Table>>> {
    Ok(Json(
        tables::create_tables_bulk(
            &state.pool,
            &claims.tenant_id,
            &claims.tenant_schema,
            body.from_table,
            body.to_table,
        )
        .await?,
    ))
}

/// `GET /api/tables/qr-batch` — active tables with QR URLs backfilled.
pub async fn qr_batch_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<Table>>> {
    Ok(Json(
        tables::qr_batch(&state.pool, &claims.tenant_id, &claims.tenant_schema).await?,
    ))
}
