//! orderdesk HTTP/JSON gateway binary.

use clap::Parser;
use orderdesk_core::SqliteStore;
use orderdesk_gateway::{create_router, AppState, Args, GatewayConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line args
    let args = Args::parse();
    let config = GatewayConfig::from(&args);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .init();

    info!(
        listen = %config.listen_addr,
        database = %config.database.display(),
        "Starting orderdesk gateway"
    );

    let store = SqliteStore::open(&config.database)?;
    if config.init_schema {
        store.create_schema()?;
        info!("Order schema ready");
    }

    // Create application state
    let state = AppState::new(store);

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Gateway listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
