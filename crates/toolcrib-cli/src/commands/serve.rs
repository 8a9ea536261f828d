//! Start the HTTP server.

use clap::Args;
use tracing::info;

use toolcrib_core::config::AppConfig;
use toolcrib_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the configured bind port
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Override the configured bind host
    #[arg(long)]
    pub host: Option<String>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }

    info!(address = %config.server.bind_address(), "Starting server from CLI");
    let state = super::connect(config).await?;
    toolcrib_api::run_server(state).await
}
