mod http;

use anyhow::Result;
use kicktv_core::{logging, Config};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (optional file + KICKTV_* environment overrides)
    let config_path = std::env::var("KICKTV_CONFIG").ok();
    let config = Config::load(config_path.as_deref()).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}");
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize logging
    logging::init_logging(&config.logging)?;

    info!("KickTV relay starting...");
    info!("HTTP address: {}", config.http_address());
    info!("Resolver API base: {}", config.resolver.api_base);

    let state = http::AppState::new(&config);
    let router = http::create_router(state);

    let http_address = config.http_address();
    let http_addr: std::net::SocketAddr = http_address
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid HTTP address {http_address}: {e}"))?;

    let listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {http_addr}: {e}"))?;

    info!("HTTP server listening on {}", http_addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("HTTP server error: {}", e);
        return Err(e.into());
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
