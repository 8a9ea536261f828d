//! Worker listing commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use toolcrib_core::config::AppConfig;
use toolcrib_core::error::AppError;
use toolcrib_core::types::PageRequest;
use toolcrib_entity::worker::{WorkerFilter, WorkerStatus};

use crate::output::{self, OutputFormat};

/// Arguments for worker commands
#[derive(Debug, Args)]
pub struct WorkerArgs {
    /// Worker subcommand
    #[command(subcommand)]
    pub command: WorkerCommand,
}

/// Worker subcommands
#[derive(Debug, Subcommand)]
pub enum WorkerCommand {
    /// List workers
    List {
        /// Filter by status (active, inactive, suspended)
        #[arg(short, long)]
        status: Option<String>,
        /// Name or badge substring
        #[arg(long)]
        search: Option<String>,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct WorkerRow {
    id: i64,
    badge: String,
    name: String,
    department: String,
    status: String,
}

/// Execute worker commands
pub async fn execute(args: &WorkerArgs, config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        WorkerCommand::List { status, search, page } => {
            let status = status
                .as_deref()
                .map(|s| s.parse::<WorkerStatus>())
                .transpose()?;
            let filter = WorkerFilter {
                status,
                search: search.clone(),
                ..Default::default()
            };

            let state = super::connect(config).await?;
            let result = state
                .worker_service
                .list_workers(&filter, PageRequest::new(*page, 50))
                .await?;

            let rows: Vec<WorkerRow> = result
                .items
                .iter()
                .map(|w| WorkerRow {
                    id: w.id.get(),
                    badge: w.badge_number.clone(),
                    name: w.name.clone(),
                    department: w.department.clone().unwrap_or_default(),
                    status: w.status.to_string(),
                })
                .collect();

            output::print_list(&rows, format);
            println!("Page {} of {} ({} workers)", result.page, result.total_pages, result.total_items);
        }
    }

    Ok(())
}
