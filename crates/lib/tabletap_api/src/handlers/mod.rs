//! Request handlers.

pub mod analytics;
pub mod auth;
pub mod hello;
pub mod payments;
pub mod sso;
pub mod staff;
pub mod subscriptions;
pub mod tables;
pub mod tenants;
pub mod tools;
pub mod webhooks;
