//! Scanner lookups.

use std::sync::Arc;

use tracing::debug;

use toolcrib_core::config::ScannerConfig;
use toolcrib_core::error::AppError;
use toolcrib_core::result::AppResult;
use toolcrib_database::InventoryStore;
use toolcrib_entity::scan::QrPayload;
use toolcrib_entity::worker::WorkerSummary;

use super::result::ScanResult;
use crate::context::RequestContext;

/// Resolves scanned labels and lists workers for the picker.
#[derive(Debug, Clone)]
pub struct ScannerService {
    store: Arc<dyn InventoryStore>,
    worker_search_limit: u32,
}

impl ScannerService {
    /// Creates a new scanner service.
    pub fn new(store: Arc<dyn InventoryStore>, config: &ScannerConfig) -> Self {
        Self {
            store,
            worker_search_limit: config.worker_search_limit,
        }
    }

    /// Resolve a raw scanned payload to the tool and its open checkout.
    pub async fn scan_lookup(&self, ctx: &RequestContext, raw_payload: &str) -> AppResult<ScanResult> {
        let code = QrPayload::parse(raw_payload)?;

        let tool = self
            .store
            .find_tool_by_code(&code)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Tool with code {code} not found")))?;

        let open = self.store.find_open_checkout_for_tool(tool.id).await?;
        debug!(code = %tool.code, checked_out = open.is_some(), "Scan lookup");

        Ok(ScanResult::new(&tool, open.as_ref(), ctx.request_time))
    }

    /// Active workers matching `search`, ordered by name, capped at the
    /// configured limit.
    pub async fn list_active_workers(&self, search: Option<&str>) -> AppResult<Vec<WorkerSummary>> {
        self.store
            .search_active_workers(search, self.worker_search_limit)
            .await
    }
}
