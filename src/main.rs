use orderbook_gateway::auth::PartyResolver;
use orderbook_gateway::config::AppConfig;
use orderbook_gateway::pqs::PostgresPqs;
use orderbook_gateway::router::create_router;
use orderbook_gateway::state::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting order book gateway");

    let config = AppConfig::from_env()?;

    // Lazy pool: the process (and /health) must come up even when the
    // projection store is down.
    let pool = PgPoolOptions::new()
        .max_connections(config.pqs_max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(20))
        .connect_lazy(&config.database_url)?;

    let pqs = Arc::new(PostgresPqs::new(pool, config.pqs_query_timeout));
    let resolver = PartyResolver::from_config(&config);
    let state = AppState::new(pqs, resolver);

    let app = create_router(state);

    let listener = TcpListener::bind(config.listen).await?;
    tracing::info!("Listening on {}", config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
