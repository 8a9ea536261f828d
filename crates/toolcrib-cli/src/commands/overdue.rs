//! Overdue checkout commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use toolcrib_core::config::AppConfig;
use toolcrib_core::error::AppError;
use toolcrib_core::types::PageRequest;
use toolcrib_entity::checkout::{CheckoutFilter, CheckoutState};

use crate::output::{self, OutputFormat};

/// Arguments for overdue commands
#[derive(Debug, Args)]
pub struct OverdueArgs {
    /// Overdue subcommand
    #[command(subcommand)]
    pub command: OverdueCommand,
}

/// Overdue subcommands
#[derive(Debug, Subcommand)]
pub enum OverdueCommand {
    /// Recompute the stored overdue flag of every checkout
    Refresh,
    /// List open checkouts past their due time
    List {
        /// Maximum rows to show
        #[arg(short, long, default_value_t = 100)]
        limit: u64,
    },
}

/// Overdue checkout row for table output
#[derive(Debug, Serialize, Tabled)]
struct OverdueRow {
    /// Checkout ID
    id: i64,
    /// Tool code
    tool: String,
    /// Worker name
    worker: String,
    /// Badge number
    badge: String,
    /// Checked out at
    checked_out_at: String,
    /// Due at
    expected_return_at: String,
}

/// Execute overdue commands
pub async fn execute(args: &OverdueArgs, config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let state = super::connect(config).await?;
    let ctx = state.system_context();

    match &args.command {
        OverdueCommand::Refresh => {
            let updated = state.checkout_service.refresh_overdue(&ctx).await?;
            output::print_success(&format!("{updated} checkout(s) updated"));
        }
        OverdueCommand::List { limit } => {
            let filter = CheckoutFilter {
                state: Some(CheckoutState::Overdue),
                ..Default::default()
            };
            let page = state
                .checkout_service
                .list_checkouts(&ctx, &filter, PageRequest::new(1, *limit))
                .await?;

            let rows: Vec<OverdueRow> = page
                .items
                .iter()
                .map(|d| OverdueRow {
                    id: d.checkout.id.get(),
                    tool: d.tool.code.clone(),
                    worker: d.worker.name.clone(),
                    badge: d.worker.badge_number.clone(),
                    checked_out_at: output::format_time(Some(d.checkout.checked_out_at)),
                    expected_return_at: output::format_time(d.checkout.expected_return_at),
                })
                .collect();

            output::print_list(&rows, format);
            if page.total_items > rows.len() as u64 {
                output::print_warning(&format!(
                    "Showing {} of {} overdue checkouts",
                    rows.len(),
                    page.total_items
                ));
            }
        }
    }

    Ok(())
}
