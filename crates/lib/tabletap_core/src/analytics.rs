//! Tenant-scoped analytics: event tracking and dashboard rollups.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use crate::models::event::{DashboardSummary, Event, EventTypeCount};
use crate::uuid::uuidv7;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// Record an event.
pub async fn track_event(
    pool: &PgPool,
    tenant_id: &str,
    event_type: &str,
    user_id: Option<&str>,
    data: &serde_json::Value,
    ip_address: Option<&str>,
    user_agent: &str,
) -> Result<String, AnalyticsError> {
    if event_type.trim().is_empty() {
        return Err(AnalyticsError::ValidationError(
            "event_type is required".into(),
        ));
    }
    let id = uuidv7().to_string();
    sqlx::query(
        "INSERT INTO events (id, tenant_id, event_type, user_id, data, ip_address, user_agent) \
         VALUES ($1::uuid, $2::uuid, $3, $4::uuid, $5, $6, $7)",
    )
    .bind(&id)
    .bind(tenant_id)
    .bind(event_type)
    .bind(user_id)
    .bind(data)
    .bind(ip_address)
    .bind(user_agent)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Event query filters. All optional, combined with AND.
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub event_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// List events for a tenant, newest first, capped at 500 rows.
pub async fn list_events(
    pool: &PgPool,
    tenant_id: &str,
    filter: &EventFilter,
) -> Result<Vec<Event>, AnalyticsError> {
    let rows = sqlx::query_as::<_, (
        String,
        String,
        Option<String>,
        serde_json::Value,
        Option<String>,
        String,
        DateTime<Utc>,
    )>(
        "SELECT id::text, event_type, user_id::text, data, ip_address, user_agent, created_at \
         FROM events \
         WHERE tenant_id = $1::uuid \
           AND ($2::text IS NULL OR event_type = $2) \
           AND ($3::timestamptz IS NULL OR created_at >= $3) \
           AND ($4::timestamptz IS NULL OR created_at <= $4) \
         ORDER BY created_at DESC \
         LIMIT 500",
    )
    .bind(tenant_id)
    .bind(&filter.event_type)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(
            |(id, event_type, user_id, data, ip_address, user_agent, created_at)| Event {
                id,
                tenant_id: tenant_id.to_string(),
                event_type,
                user_id,
                data,
                ip_address,
                user_agent,
                created_at,
            },
        )
        .collect())
}

/// Dashboard rollup: today/week/month counts plus a 30-day per-type
/// breakdown.
pub async fn dashboard_summary(
    pool: &PgPool,
    tenant_id: &str,
) -> Result<DashboardSummary, AnalyticsError> {
    let (today_events, week_events, month_events) = sqlx::query_as::<_, (i64, i64, i64)>(
        "SELECT \
           COUNT(*) FILTER (WHERE created_at >= date_trunc('day', NOW())), \
           COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '7 days'), \
           COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '30 days') \
         FROM events WHERE tenant_id = $1::uuid",
    )
    .bind(tenant_id)
    .fetch_one(pool)
    .await?;

    let breakdown = sqlx::query_as::<_, (String, i64)>(
        "SELECT event_type, COUNT(*) FROM events \
         WHERE tenant_id = $1::uuid AND created_at >= NOW() - INTERVAL '30 days' \
         GROUP BY event_type ORDER BY COUNT(*) DESC",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;

    Ok(DashboardSummary {
        today_events,
        week_events,
        month_events,
        event_breakdown: breakdown
            .into_iter()
            .map(|(event_type, count)| EventTypeCount { event_type, count })
            .collect(),
    })
}
