//! PostgreSQL-backed inventory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use toolcrib_core::error::{AppError, ErrorKind};
use toolcrib_core::result::AppResult;
use toolcrib_core::types::{CheckoutId, PageRequest, PageResponse, ToolId, WorkerId};
use toolcrib_entity::checkout::{
    Checkout, CheckoutDetails, CheckoutFilter, CloseCheckout, NewCheckout,
};
use toolcrib_entity::tool::{CreateTool, Tool, ToolFilter, ToolStatus};
use toolcrib_entity::worker::{CreateWorker, Worker, WorkerFilter, WorkerSummary};

use super::{attach_details, InventoryStore, InventoryTransaction};
use crate::connection::{ping, DatabasePool};
use crate::repositories::{self, db_error, CheckoutRepository, ToolRepository, WorkerRepository};

/// Inventory store over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgInventoryStore {
    pool: PgPool,
    tools: ToolRepository,
    workers: WorkerRepository,
    checkouts: CheckoutRepository,
}

impl PgInventoryStore {
    /// Build the store and its repositories over `db`.
    pub fn new(db: &DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            tools: ToolRepository::new(pool.clone()),
            workers: WorkerRepository::new(pool.clone()),
            checkouts: CheckoutRepository::new(pool.clone()),
            pool,
        }
    }

    async fn details_for(&self, checkout: Checkout) -> AppResult<CheckoutDetails> {
        let tool = self.tools.find_by_id(checkout.tool_id).await?;
        let worker = self.workers.find_by_id(checkout.worker_id).await?;
        attach_details(vec![checkout], tool.into_iter().collect(), worker.into_iter().collect())?
            .pop()
            .ok_or_else(|| AppError::internal("Checkout details could not be assembled"))
    }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn begin(&self) -> AppResult<Box<dyn InventoryTransaction>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgInventoryTransaction { tx }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        ping(&self.pool).await
    }

    async fn find_tool(&self, id: ToolId) -> AppResult<Option<Tool>> {
        self.tools.find_by_id(id).await
    }

    async fn find_tool_by_code(&self, code: &str) -> AppResult<Option<Tool>> {
        self.tools.find_by_code(code).await
    }

    async fn list_tools(&self, filter: &ToolFilter, page: &PageRequest) -> AppResult<PageResponse<Tool>> {
        self.tools.list(filter, page).await
    }

    async fn create_tool(&self, data: &CreateTool, now: DateTime<Utc>) -> AppResult<Tool> {
        self.tools.create(data, now).await
    }

    async fn set_tool_qr_code(&self, id: ToolId, qr_code: Option<&str>, now: DateTime<Utc>) -> AppResult<()> {
        self.tools.set_qr_code(id, qr_code, now).await
    }

    async fn find_worker(&self, id: WorkerId) -> AppResult<Option<Worker>> {
        self.workers.find_by_id(id).await
    }

    async fn list_workers(&self, filter: &WorkerFilter, page: &PageRequest) -> AppResult<PageResponse<Worker>> {
        self.workers.list(filter, page).await
    }

    async fn search_active_workers(&self, search: Option<&str>, limit: u32) -> AppResult<Vec<WorkerSummary>> {
        self.workers.search_active(search, limit).await
    }

    async fn create_worker(&self, data: &CreateWorker, now: DateTime<Utc>) -> AppResult<Worker> {
        self.workers.create(data, now).await
    }

    async fn count_open_checkouts(&self, worker_id: WorkerId) -> AppResult<u64> {
        self.checkouts.count_open_for_worker(worker_id).await
    }

    async fn find_checkout(&self, id: CheckoutId) -> AppResult<Option<Checkout>> {
        self.checkouts.find_by_id(id).await
    }

    async fn find_checkout_details(&self, id: CheckoutId) -> AppResult<Option<CheckoutDetails>> {
        match self.checkouts.find_by_id(id).await? {
            Some(checkout) => self.details_for(checkout).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_open_checkout_for_tool(&self, tool_id: ToolId) -> AppResult<Option<CheckoutDetails>> {
        match self.checkouts.find_open_for_tool(tool_id).await? {
            Some(checkout) => self.details_for(checkout).await.map(Some),
            None => Ok(None),
        }
    }

    async fn list_checkouts(
        &self,
        filter: &CheckoutFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckoutDetails>> {
        let listed = self.checkouts.list(filter, now, page).await?;

        let tool_ids: Vec<ToolId> = listed.items.iter().map(|c| c.tool_id).collect();
        let worker_ids: Vec<WorkerId> = listed.items.iter().map(|c| c.worker_id).collect();
        let tools = self.tools.find_many(&tool_ids).await?;
        let workers = self.workers.find_many(&worker_ids).await?;

        let items = attach_details(listed.items, tools, workers)?;
        Ok(PageResponse::new(items, page, listed.total_items))
    }

    async fn refresh_overdue_flags(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.checkouts.refresh_overdue(now).await
    }
}

/// A PostgreSQL transaction. Row locks taken through it are held until
/// commit or drop.
pub struct PgInventoryTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl InventoryTransaction for PgInventoryTransaction {
    async fn lock_tool(&mut self, id: ToolId) -> AppResult<Option<Tool>> {
        repositories::tool::lock_by_id(&mut *self.tx, id).await
    }

    async fn find_worker(&mut self, id: WorkerId) -> AppResult<Option<Worker>> {
        repositories::worker::find_by_id(&mut *self.tx, id).await
    }

    async fn lock_worker(&mut self, id: WorkerId) -> AppResult<Option<Worker>> {
        repositories::worker::lock_by_id(&mut *self.tx, id).await
    }

    async fn count_open_checkouts(&mut self, worker_id: WorkerId) -> AppResult<u64> {
        repositories::checkout::count_open_for_worker(&mut *self.tx, worker_id).await
    }

    async fn update_worker(&mut self, worker: &Worker, now: DateTime<Utc>) -> AppResult<Worker> {
        repositories::worker::update(&mut *self.tx, worker, now).await
    }

    async fn soft_delete_worker(&mut self, id: WorkerId, now: DateTime<Utc>) -> AppResult<()> {
        repositories::worker::soft_delete(&mut *self.tx, id, now).await
    }

    async fn lock_checkout(&mut self, id: CheckoutId) -> AppResult<Option<Checkout>> {
        repositories::checkout::lock_by_id(&mut *self.tx, id).await
    }

    async fn has_open_checkout(&mut self, tool_id: ToolId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM checkouts WHERE tool_id = $1 AND returned_at IS NULL)",
        )
        .bind(tool_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to check open checkouts"))
    }

    async fn insert_checkout(&mut self, data: &NewCheckout, now: DateTime<Utc>) -> AppResult<Checkout> {
        repositories::checkout::insert(&mut *self.tx, data, now).await
    }

    async fn close_checkout(
        &mut self,
        id: CheckoutId,
        data: &CloseCheckout,
        now: DateTime<Utc>,
    ) -> AppResult<Checkout> {
        repositories::checkout::close(&mut *self.tx, id, data, now).await
    }

    async fn update_checkout(&mut self, checkout: &Checkout, now: DateTime<Utc>) -> AppResult<Checkout> {
        repositories::checkout::update(&mut *self.tx, checkout, now).await
    }

    async fn set_tool_status(&mut self, id: ToolId, status: ToolStatus, now: DateTime<Utc>) -> AppResult<Tool> {
        repositories::tool::set_status(&mut *self.tx, id, status, now).await
    }

    async fn update_tool(&mut self, tool: &Tool, now: DateTime<Utc>) -> AppResult<Tool> {
        repositories::tool::update(&mut *self.tx, tool, now).await
    }

    async fn soft_delete_tool(&mut self, id: ToolId, now: DateTime<Utc>) -> AppResult<()> {
        repositories::tool::soft_delete(&mut *self.tx, id, now).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
    }
}
