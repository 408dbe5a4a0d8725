//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, m.as_str()),
            AppError::Gateway(m) => (StatusCode::BAD_GATEWAY, m.as_str()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        let body = Json(ErrorResponse {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<tabletap_core::auth::AuthError> for AppError {
    fn from(e: tabletap_core::auth::AuthError) -> Self {
        use tabletap_core::auth::AuthError;
        match e {
            AuthError::CredentialError => AppError::Unauthorized("Invalid credentials".into()),
            AuthError::TokenError(msg) => AppError::Unauthorized(msg),
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::DbError(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<tabletap_core::sso::SsoError> for AppError {
    fn from(e: tabletap_core::sso::SsoError) -> Self {
        use tabletap_core::sso::SsoError;
        match e {
            SsoError::AccessDenied => AppError::Forbidden("Access denied".into()),
            SsoError::TokenNotFound => AppError::Validation("Invalid token".into()),
            SsoError::TokenExpiredOrConsumed => {
                AppError::Validation("Token expired or invalid".into())
            }
            SsoError::TokenError(msg) => AppError::Internal(msg),
            SsoError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<tabletap_core::billing::BillingError> for AppError {
    fn from(e: tabletap_core::billing::BillingError) -> Self {
        use tabletap_core::billing::BillingError;
        match e {
            BillingError::PlanNotFound => AppError::NotFound("Plan not found".into()),
            BillingError::SubscriptionNotFound => {
                AppError::NotFound("No subscription found".into())
            }
            BillingError::SubscriptionExists => {
                AppError::Validation("Subscription already exists".into())
            }
            BillingError::PaymentNotFound => AppError::NotFound("Payment not found".into()),
            BillingError::ValidationError(msg) => AppError::Validation(msg),
            BillingError::GatewayError(msg) => AppError::Gateway(msg),
            BillingError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<tabletap_core::tenants::TenantError> for AppError {
    fn from(e: tabletap_core::tenants::TenantError) -> Self {
        use tabletap_core::tenants::TenantError;
        match e {
            TenantError::NotFound => AppError::NotFound("Tenant not found".into()),
            TenantError::ValidationError(msg) => AppError::Validation(msg),
            TenantError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<tabletap_core::staff::StaffError> for AppError {
    fn from(e: tabletap_core::staff::StaffError) -> Self {
        use tabletap_core::staff::StaffError;
        match e {
            StaffError::NotFound => AppError::NotFound("Staff member not found".into()),
            StaffError::AlreadyExists => {
                AppError::Validation("Staff member already exists for this user".into())
            }
            StaffError::ValidationError(msg) => AppError::Validation(msg),
            StaffError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<tabletap_core::tables::TableError> for AppError {
    fn from(e: tabletap_core::tables::TableError) -> Self {
        use tabletap_core::tables::TableError;
        match e {
            TableError::NotFound => AppError::NotFound("Table not found".into()),
            TableError::DuplicateNumber => {
                AppError::Validation("Table number already exists".into())
            }
            TableError::ValidationError(msg) => AppError::Validation(msg),
            TableError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<tabletap_core::analytics::AnalyticsError> for AppError {
    fn from(e: tabletap_core::analytics::AnalyticsError) -> Self {
        use tabletap_core::analytics::AnalyticsError;
        match e {
            AnalyticsError::ValidationError(msg) => AppError::Validation(msg),
            AnalyticsError::DbError(e) => AppError::from(e),
        }
    }
}
