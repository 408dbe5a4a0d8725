//! TableTap Console API server binary.

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "tabletap_server", about = "TableTap Console API server")]
struct Args {
    /// Address to bind the HTTP listener.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3400")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/tabletap"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,tabletap_api=debug,tabletap_core=debug".parse().unwrap()
            }),
        )
        .init();

    let args = Args::parse();

    info!(bind_addr = %args.bind_addr, "starting tabletap_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    tabletap_api::migrate(&pool).await?;

    let config = tabletap_api::config::ApiConfig {
        bind_addr: args.bind_addr,
        pg_connection_url: args.database_url,
        jwt_secret: tabletap_core::auth::jwt::resolve_jwt_secret(),
        paystack_secret_key: std::env::var("PAYSTACK_SECRET_KEY").unwrap_or_default(),
    };

    if config.paystack_secret_key.is_empty() {
        tracing::warn!("PAYSTACK_SECRET_KEY not set; checkout and webhooks will be rejected");
    }

    let state = tabletap_api::AppState {
        pool,
        config: config.clone(),
    };

    let app = tabletap_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
