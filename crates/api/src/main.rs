//! LoanGuard API server binary entrypoint.

use std::net::SocketAddr;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use loanguard_common::config::AppConfig;
use loanguard_feed::PriceFeed;

use loanguard_api::routes::create_router;
use loanguard_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("loanguard_api=debug,loanguard_engine=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting LoanGuard API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Build the live price feed
    let feed = PriceFeed::from_config(&config)?;
    tracing::info!(url = %config.price_feed_url, "Price feed configured");

    // Build application state
    let port = config.api_port;
    let state = AppState::new(feed, config);

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
