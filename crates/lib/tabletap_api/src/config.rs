//! API server configuration.

use tabletap_core::auth::jwt::resolve_jwt_secret;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3400").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// JWT signing secret (access tokens and SSO tokens).
    pub jwt_secret: String,
    /// Paystack secret key, used for API calls and webhook signatures.
    pub paystack_secret_key: String,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable             | Default                                  |
    /// |----------------------|------------------------------------------|
    /// | `BIND_ADDR`          | `127.0.0.1:3400`                         |
    /// | `DATABASE_URL`       | `postgres://localhost:5432/tabletap`     |
    /// | `JWT_SECRET` / `AUTH_SECRET` | generated & persisted to file    |
    /// | `PAYSTACK_SECRET_KEY` | empty (webhooks rejected until set)     |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3400".into()),
            pg_connection_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/tabletap".into()),
            jwt_secret: resolve_jwt_secret(),
            paystack_secret_key: std::env::var("PAYSTACK_SECRET_KEY").unwrap_or_default(),
        }
    }
}
