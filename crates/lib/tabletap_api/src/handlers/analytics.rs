//! Analytics handlers.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::{Extension, Json};

use tabletap_core::analytics::{self, EventFilter};
use tabletap_core::models::event::{DashboardSummary, Event};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{EventsQuery, TrackEventRequest, TrackEventResponse};

/// `POST /api/analytics/track` — record an event for the tenant.
pub async fn track_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    headers: HeaderMap,
    Json(body): Json<TrackEventRequest>,
) -> AppResult<Json<TrackEventResponse>> {
    // First hop of X-Forwarded-For; the server sits behind a proxy.
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let id = analytics::track_event(
        &state.pool,
        &claims.tenant_id,
        &body.event_type,
        Some(&claims.sub),
        &body.data,
        ip_address.as_deref(),
        user_agent,
    )
    .await?;
    Ok(Json(TrackEventResponse { id }))
}

/// `GET /api/analytics/events` — filtered event list, newest first.
pub async fn list_events_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Query(query): Query<EventsQuery>,
) -> AppResult<Json<Vec<Event>>> {
    let filter = EventFilter {
        event_type: query.event_type,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    Ok(Json(
        analytics::list_events(&state.pool, &claims.tenant_id, &filter).await?,
    ))
}

/// `GET /api/analytics/dashboard` — today/week/month rollup.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<DashboardSummary>> {
    Ok(Json(
        analytics::dashboard_summary(&state.pool, &claims.tenant_id).await?,
    ))
}
