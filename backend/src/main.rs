use std::net::SocketAddr;

use account_service::{
    config::AppConfig, create_router, initialize_backend, shutdown::shutdown_signal,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// Process exit codes
const CONFIG_ERROR_EXIT_CODE: i32 = 1;
const STORE_ERROR_EXIT_CODE: i32 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured JSON logs, level from RUST_LOG
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(CONFIG_ERROR_EXIT_CODE);
        }
    };

    let app_state = match initialize_backend(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to open account store: {:#}", e);
            std::process::exit(STORE_ERROR_EXIT_CODE);
        }
    };

    let app = create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.app_port));
    let listener = TcpListener::bind(addr).await?;
    info!(service = "account-service", transport = "http", address = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
