//! # tabletap_api
//!
//! HTTP API library for TableTap Console.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::Router;
use axum::routing::{get, patch, post};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{
    analytics, auth, hello, payments, sso, staff, subscriptions, tables, tenants, tools, webhooks,
};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
}

/// Run embedded database migrations.
///
/// Delegates to `tabletap_core::migrate::migrate()` which owns the
/// migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tabletap_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/api/hello", get(hello::hello_world))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/sso/verify", post(sso::verify_handler))
        .route("/api/webhook/paystack", post(webhooks::paystack_handler))
        .route("/api/plans", get(subscriptions::list_plans_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route("/api/auth/profile", get(auth::profile_handler))
        .route("/api/tools", get(tools::list_tools_handler))
        .route(
            "/api/tools/access",
            get(tools::list_access_handler).post(tools::grant_access_handler),
        )
        .route("/api/sso/generate", post(sso::generate_handler))
        .route(
            "/api/subscription",
            get(subscriptions::get_subscription_handler)
                .post(subscriptions::create_subscription_handler),
        )
        .route(
            "/api/subscription/cancel",
            post(subscriptions::cancel_subscription_handler),
        )
        .route("/api/payments/initialize", post(payments::initialize_handler))
        .route("/api/payments", get(payments::list_payments_handler))
        .route(
            "/api/tenant",
            get(tenants::get_tenant_handler).patch(tenants::update_tenant_handler),
        )
        .route(
            "/api/staff/roles",
            get(staff::list_roles_handler).post(staff::create_role_handler),
        )
        .route(
            "/api/staff",
            get(staff::list_staff_handler).post(staff::create_staff_handler),
        )
        .route("/api/staff/{id}/activate", post(staff::activate_handler))
        .route("/api/staff/{id}/deactivate", post(staff::deactivate_handler))
        .route(
            "/api/tables",
            get(tables::list_tables_handler).post(tables::create_table_handler),
        )
        .route("/api/tables/bulk", post(tables::bulk_create_handler))
        .route("/api/tables/qr-batch", get(tables::qr_batch_handler))
        .route("/api/tables/{id}", patch(tables::update_table_handler))
        .route("/api/analytics/track", post(analytics::track_handler))
        .route("/api/analytics/events", get(analytics::list_events_handler))
        .route(
            "/api/analytics/dashboard",
            get(analytics::dashboard_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
