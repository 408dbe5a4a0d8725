//! Analytics event domain model.

use serde::{Deserialize, Serialize};

/// A tracked analytics event, scoped to a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub tenant_id: String,
    pub event_type: String,
    pub user_id: Option<String>,
    pub data: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Per-type event count for dashboard breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTypeCount {
    pub event_type: String,
    pub count: i64,
}

/// Dashboard summary counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub today_events: i64,
    pub week_events: i64,
    pub month_events: i64,
    pub event_breakdown: Vec<EventTypeCount>,
}
