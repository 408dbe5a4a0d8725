//! Subscription billing: plans, subscriptions, payments, and the Paystack
//! integration (checkout initiation + webhook settlement).

pub mod paystack;
pub mod queries;
pub mod signature;
pub mod webhook;

use thiserror::Error;

/// Billing errors.
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Plan not found")]
    PlanNotFound,

    #[error("No subscription found")]
    SubscriptionNotFound,

    #[error("Subscription already exists")]
    SubscriptionExists,

    #[error("Payment not found")]
    PaymentNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Payment gateway error: {0}")]
    GatewayError(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}
