//! Tool listing commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use toolcrib_core::config::AppConfig;
use toolcrib_core::error::AppError;
use toolcrib_core::types::PageRequest;
use toolcrib_entity::tool::{ToolFilter, ToolStatus};

use crate::output::{self, OutputFormat};

/// Arguments for tool commands
#[derive(Debug, Args)]
pub struct ToolArgs {
    /// Tool subcommand
    #[command(subcommand)]
    pub command: ToolCommand,
}

/// Tool subcommands
#[derive(Debug, Subcommand)]
pub enum ToolCommand {
    /// List tools
    List {
        /// Filter by status (available, checked_out, maintenance, retired)
        #[arg(short, long)]
        status: Option<String>,
        /// Name or code substring
        #[arg(long)]
        search: Option<String>,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
}

/// Tool display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ToolRow {
    /// Tool ID
    id: i64,
    /// Code
    code: String,
    /// Name
    name: String,
    /// Status
    status: String,
    /// Location
    location: String,
    /// Label file
    qr_code: String,
}

/// Execute tool commands
pub async fn execute(args: &ToolArgs, config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ToolCommand::List { status, search, page } => {
            let status = status
                .as_deref()
                .map(|s| s.parse::<ToolStatus>())
                .transpose()?;
            let filter = ToolFilter {
                status,
                search: search.clone(),
                ..Default::default()
            };

            let state = super::connect(config).await?;
            let result = state
                .tool_service
                .list_tools(&filter, PageRequest::new(*page, 50))
                .await?;

            let rows: Vec<ToolRow> = result
                .items
                .iter()
                .map(|t| ToolRow {
                    id: t.id.get(),
                    code: t.code.clone(),
                    name: t.name.clone(),
                    status: t.status.to_string(),
                    location: t.location.clone().unwrap_or_default(),
                    qr_code: t.qr_code.clone().unwrap_or_else(|| "-".to_string()),
                })
                .collect();

            output::print_list(&rows, format);
            println!("Page {} of {} ({} tools)", result.page, result.total_pages, result.total_items);
        }
    }

    Ok(())
}
