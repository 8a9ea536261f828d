//! The inventory store abstraction.
//!
//! [`InventoryStore`] covers reads and administrative writes;
//! [`InventoryTransaction`] covers the state transitions that must happen
//! atomically under row locks (checkout, return, and the admin edits that
//! race with them). A transaction dropped without
//! [`InventoryTransaction::commit`] rolls back.

pub mod memory;
pub mod postgres;

pub use memory::MemoryInventoryStore;
pub use postgres::PgInventoryStore;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use toolcrib_core::error::AppError;
use toolcrib_core::result::AppResult;
use toolcrib_core::types::{CheckoutId, PageRequest, PageResponse, ToolId, WorkerId};
use toolcrib_entity::checkout::{
    Checkout, CheckoutDetails, CheckoutFilter, CloseCheckout, NewCheckout,
};
use toolcrib_entity::tool::{CreateTool, Tool, ToolFilter, ToolStatus};
use toolcrib_entity::worker::{CreateWorker, Worker, WorkerFilter, WorkerSummary};

/// Persistent storage for tools, workers and checkouts.
///
/// Finders return soft-deleted rows too; callers decide what a deleted row
/// means. Listings never include soft-deleted rows.
#[async_trait]
pub trait InventoryStore: Send + Sync + std::fmt::Debug + 'static {
    /// Open a transaction.
    async fn begin(&self) -> AppResult<Box<dyn InventoryTransaction>>;

    /// Check store connectivity.
    async fn health_check(&self) -> AppResult<bool>;

    /// Find a tool by id.
    async fn find_tool(&self, id: ToolId) -> AppResult<Option<Tool>>;

    /// Find a tool by its unique code.
    async fn find_tool_by_code(&self, code: &str) -> AppResult<Option<Tool>>;

    /// List live tools.
    async fn list_tools(&self, filter: &ToolFilter, page: &PageRequest) -> AppResult<PageResponse<Tool>>;

    /// Insert a tool. Duplicate codes fail with `Conflict`.
    async fn create_tool(&self, data: &CreateTool, now: DateTime<Utc>) -> AppResult<Tool>;

    /// Record or clear the QR image file name of a tool.
    async fn set_tool_qr_code(&self, id: ToolId, qr_code: Option<&str>, now: DateTime<Utc>) -> AppResult<()>;

    /// Find a worker by id.
    async fn find_worker(&self, id: WorkerId) -> AppResult<Option<Worker>>;

    /// List live workers.
    async fn list_workers(&self, filter: &WorkerFilter, page: &PageRequest) -> AppResult<PageResponse<Worker>>;

    /// Active workers matching `search` on name or badge, ordered by name,
    /// at most `limit` rows.
    async fn search_active_workers(&self, search: Option<&str>, limit: u32) -> AppResult<Vec<WorkerSummary>>;

    /// Insert a worker. Duplicate badge numbers or emails fail with `Conflict`.
    async fn create_worker(&self, data: &CreateWorker, now: DateTime<Utc>) -> AppResult<Worker>;

    /// Number of open checkouts held by a worker.
    async fn count_open_checkouts(&self, worker_id: WorkerId) -> AppResult<u64>;

    /// Find a checkout by id.
    async fn find_checkout(&self, id: CheckoutId) -> AppResult<Option<Checkout>>;

    /// Find a checkout with its tool and worker.
    async fn find_checkout_details(&self, id: CheckoutId) -> AppResult<Option<CheckoutDetails>>;

    /// The open checkout of a tool with its tool and worker.
    async fn find_open_checkout_for_tool(&self, tool_id: ToolId) -> AppResult<Option<CheckoutDetails>>;

    /// List checkouts, newest first, evaluating `overdue` at `now`.
    async fn list_checkouts(
        &self,
        filter: &CheckoutFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckoutDetails>>;

    /// Recompute every cached overdue flag. Returns the number changed.
    async fn refresh_overdue_flags(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// An open, all-or-nothing unit of work.
#[async_trait]
pub trait InventoryTransaction: Send {
    /// Load a tool and lock it until the transaction ends.
    async fn lock_tool(&mut self, id: ToolId) -> AppResult<Option<Tool>>;

    /// Load a worker.
    async fn find_worker(&mut self, id: WorkerId) -> AppResult<Option<Worker>>;

    /// Load a worker and lock it until the transaction ends.
    async fn lock_worker(&mut self, id: WorkerId) -> AppResult<Option<Worker>>;

    /// Number of open checkouts held by a worker.
    async fn count_open_checkouts(&mut self, worker_id: WorkerId) -> AppResult<u64>;

    /// Persist every editable column of `worker`. Duplicate badge numbers or
    /// emails fail with `Conflict`.
    async fn update_worker(&mut self, worker: &Worker, now: DateTime<Utc>) -> AppResult<Worker>;

    /// Soft-delete a worker.
    async fn soft_delete_worker(&mut self, id: WorkerId, now: DateTime<Utc>) -> AppResult<()>;

    /// Load a checkout and lock it until the transaction ends.
    async fn lock_checkout(&mut self, id: CheckoutId) -> AppResult<Option<Checkout>>;

    /// Persist the non-lifecycle columns of a locked `checkout`.
    async fn update_checkout(&mut self, checkout: &Checkout, now: DateTime<Utc>) -> AppResult<Checkout>;

    /// Whether the tool has an open checkout.
    async fn has_open_checkout(&mut self, tool_id: ToolId) -> AppResult<bool>;

    /// Open a checkout.
    async fn insert_checkout(&mut self, data: &NewCheckout, now: DateTime<Utc>) -> AppResult<Checkout>;

    /// Close a checkout, clearing its overdue flag.
    async fn close_checkout(
        &mut self,
        id: CheckoutId,
        data: &CloseCheckout,
        now: DateTime<Utc>,
    ) -> AppResult<Checkout>;

    /// Move a tool to `status`.
    async fn set_tool_status(&mut self, id: ToolId, status: ToolStatus, now: DateTime<Utc>) -> AppResult<Tool>;

    /// Persist every editable column of `tool`.
    async fn update_tool(&mut self, tool: &Tool, now: DateTime<Utc>) -> AppResult<Tool>;

    /// Soft-delete a tool.
    async fn soft_delete_tool(&mut self, id: ToolId, now: DateTime<Utc>) -> AppResult<()>;

    /// Make every write of this transaction visible.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Join checkouts with their tools and workers, preserving checkout order.
pub(crate) fn attach_details(
    checkouts: Vec<Checkout>,
    tools: Vec<Tool>,
    workers: Vec<Worker>,
) -> AppResult<Vec<CheckoutDetails>> {
    let tools: HashMap<ToolId, Tool> = tools.into_iter().map(|t| (t.id, t)).collect();
    let workers: HashMap<WorkerId, Worker> = workers.into_iter().map(|w| (w.id, w)).collect();

    checkouts
        .into_iter()
        .map(|checkout| {
            let tool = tools.get(&checkout.tool_id).cloned().ok_or_else(|| {
                AppError::internal(format!("Checkout {} references missing tool {}", checkout.id, checkout.tool_id))
            })?;
            let worker = workers.get(&checkout.worker_id).cloned().ok_or_else(|| {
                AppError::internal(format!(
                    "Checkout {} references missing worker {}",
                    checkout.id, checkout.worker_id
                ))
            })?;
            Ok(CheckoutDetails { checkout, tool, worker })
        })
        .collect()
}
