//! ToolCrib server: tool checkout tracking for the shop floor.
//!
//! Loads configuration, connects PostgreSQL and local QR storage, then
//! serves the scanner and admin APIs.

use tracing_subscriber::{EnvFilter, fmt};

use toolcrib_core::config::AppConfig;
use toolcrib_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load `config/default.toml` plus the overlay named by `TOOLCRIB_ENV`.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TOOLCRIB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.is_json() {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().pretty().with_env_filter(filter).with_target(true).init();
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ToolCrib v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        database = %toolcrib_database::connection::mask_password(&config.database.url),
        storage = %config.storage.root,
        "Connecting backends"
    );

    let state = toolcrib_api::connect_state(config).await?;
    toolcrib_api::run_server(state).await
}
