//! Hello world endpoint — bootstrap health check.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::models::HelloWorldResponse;

/// `GET /api/hello` — verifies core lib and DB connection.
pub async fn hello_world(State(state): State<AppState>) -> AppResult<Json<HelloWorldResponse>> {
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    Ok(Json(HelloWorldResponse {
        greeting: format!("Hello from tabletap_core v{}", tabletap_core::version()),
        db_connected,
    }))
}
