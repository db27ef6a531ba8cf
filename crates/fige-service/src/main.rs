//! Figé Storefront Service - pre-order checkout for the Figé production run.
//!
//! This is the main entry point for the storefront service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fige_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fige=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Figé Storefront Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        stripe_configured = %config.stripe_secret_key.is_some(),
        encryption_key_configured = %config.encryption_key.is_some(),
        "Service configuration loaded"
    );

    // Build app state
    let state = AppState::new(config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
