//! Request and response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned by all failing endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Generic acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HelloWorldResponse {
    pub greeting: String,
    pub db_connected: bool,
}

// Auth

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    /// Restaurant name for the provisioned tenant. Defaults to the user's
    /// name or email local part.
    pub restaurant_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub tenant_id: String,
    pub tenant_schema: String,
}

// Tools / SSO

#[derive(Debug, Deserialize)]
pub struct GrantAccessRequest {
    pub user_id: String,
    pub tool_id: String,
    pub is_granted: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateSsoRequest {
    pub tool_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SsoTokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct VerifySsoRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifySsoResponse {
    pub valid: bool,
    pub user_id: String,
    pub tool_id: String,
    pub tenant_schema: String,
}

// Billing

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub plan_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InitializePaymentResponse {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
}

// Tenant

#[derive(Debug, Deserialize)]
pub struct UpdateTenantRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub business_type: Option<String>,
    pub currency: Option<String>,
    pub timezone: Option<String>,
}

// Staff

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub user_id: String,
    pub role_id: String,
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub department: String,
}

// Tables

#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub number: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub section: String,
    pub capacity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTableRequest {
    pub name: Option<String>,
    pub section: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkCreateTablesRequest {
    #[serde(alias = "fromTable")]
    pub from_table: i32,
    #[serde(alias = "toTable")]
    pub to_table: i32,
}

// Analytics

#[derive(Debug, Deserialize)]
pub struct TrackEventRequest {
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackEventResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub event_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}
