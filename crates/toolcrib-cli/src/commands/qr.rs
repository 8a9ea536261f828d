//! QR label generation commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use toolcrib_core::config::AppConfig;
use toolcrib_core::error::AppError;
use toolcrib_core::types::{PageRequest, ToolId};
use toolcrib_entity::tool::ToolFilter;
use toolcrib_service::QrLabel;

use crate::output::{self, OutputFormat};

/// Page size used when walking every tool.
const SCAN_PAGE_SIZE: u64 = 100;

/// Arguments for QR commands
#[derive(Debug, Args)]
pub struct QrArgs {
    /// QR subcommand
    #[command(subcommand)]
    pub command: QrCommand,
}

/// QR subcommands
#[derive(Debug, Subcommand)]
pub enum QrCommand {
    /// Generate labels for the given tools
    Generate {
        /// Tool ids
        #[arg(required_unless_present = "all")]
        ids: Vec<i64>,
        /// Generate for every tool without a label
        #[arg(long, conflicts_with = "ids")]
        all: bool,
    },
    /// Delete and re-create the label of one tool
    Regenerate {
        /// Tool id
        id: i64,
    },
}

/// Label row for table output
#[derive(Debug, Serialize, Tabled)]
struct LabelRow {
    /// Tool ID
    tool_id: i64,
    /// File name
    file: String,
    /// Public URL
    url: String,
}

impl From<&QrLabel> for LabelRow {
    fn from(label: &QrLabel) -> Self {
        Self {
            tool_id: label.tool_id.get(),
            file: label.file_name.clone(),
            url: label.url.clone(),
        }
    }
}

/// Execute QR commands
pub async fn execute(args: &QrArgs, config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let state = super::connect(config).await?;
    let ctx = state.system_context();

    let labels = match &args.command {
        QrCommand::Generate { ids, all } => {
            let ids: Vec<ToolId> = if *all {
                unlabelled_tools(&state).await?
            } else {
                ids.iter().copied().map(ToolId::new).collect()
            };
            let labels = state.qr_service.generate_batch(&ctx, &ids).await?;
            if labels.len() < ids.len() {
                output::print_warning(&format!(
                    "{} tool(s) were skipped",
                    ids.len() - labels.len()
                ));
            }
            labels
        }
        QrCommand::Regenerate { id } => {
            vec![state.qr_service.regenerate_for_tool(&ctx, ToolId::new(*id)).await?]
        }
    };

    let rows: Vec<LabelRow> = labels.iter().map(LabelRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}

async fn unlabelled_tools(state: &toolcrib_api::AppState) -> Result<Vec<ToolId>, AppError> {
    let filter = ToolFilter::default();
    let mut ids = Vec::new();
    let mut page = 1;
    loop {
        let result = state
            .tool_service
            .list_tools(&filter, PageRequest::new(page, SCAN_PAGE_SIZE))
            .await?;
        ids.extend(
            result
                .items
                .iter()
                .filter(|t| t.qr_code.is_none())
                .map(|t| t.id),
        );
        if !result.has_next {
            return Ok(ids);
        }
        page += 1;
    }
}
