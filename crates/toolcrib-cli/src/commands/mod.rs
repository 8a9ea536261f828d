//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod overdue;
pub mod qr;
pub mod serve;
pub mod tool;
pub mod worker;

use clap::{Parser, Subcommand};

use toolcrib_api::AppState;
use toolcrib_core::config::AppConfig;
use toolcrib_core::error::AppError;

use crate::output::OutputFormat;

/// ToolCrib: tool checkout tracking for the shop floor
#[derive(Debug, Parser)]
#[command(name = "toolcrib", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file (extension optional)
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from the same directory
    #[arg(short, long, env = "TOOLCRIB_ENV")]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Overdue checkout maintenance
    Overdue(overdue::OverdueArgs),
    /// QR label generation
    Qr(qr::QrArgs),
    /// Tool listing
    Tool(tool::ToolArgs),
    /// Worker listing
    Worker(worker::WorkerArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, self.load_config()?).await,
            Commands::Migrate(args) => migrate::execute(args, self.load_config()?).await,
            Commands::Overdue(args) => overdue::execute(args, self.load_config()?, self.format).await,
            Commands::Qr(args) => qr::execute(args, self.load_config()?, self.format).await,
            Commands::Tool(args) => tool::execute(args, self.load_config()?, self.format).await,
            Commands::Worker(args) => worker::execute(args, self.load_config()?, self.format).await,
            Commands::Config(args) => config::execute(args, self, self.format).await,
        }
    }

    /// Load configuration from the selected file and overlay.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, self.env.as_deref())
    }
}

/// Helper: connect the database and blob store and wire the services.
pub async fn connect(config: AppConfig) -> Result<AppState, AppError> {
    toolcrib_api::connect_state(config).await
}
