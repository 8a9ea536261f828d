//! Shared fixtures for service tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use toolcrib_core::result::AppResult;
use toolcrib_core::traits::{Clock, ManualClock};
use toolcrib_core::types::{CheckoutId, PageRequest, PageResponse, ToolId, UserId, WorkerId};
use toolcrib_database::{InventoryStore, InventoryTransaction, MemoryInventoryStore};
use toolcrib_entity::checkout::{Checkout, CheckoutDetails, CheckoutFilter};
use toolcrib_entity::tool::{CreateTool, Tool, ToolFilter, ToolStatus};
use toolcrib_entity::worker::{CreateWorker, Worker, WorkerFilter, WorkerStatus, WorkerSummary};

use crate::context::RequestContext;

pub(crate) fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap()
}

pub(crate) struct Fixture {
    pub store: Arc<MemoryInventoryStore>,
    pub clock: Arc<ManualClock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryInventoryStore::new()),
            clock: Arc::new(ManualClock::new(start())),
        }
    }

    pub fn dyn_store(&self) -> Arc<dyn InventoryStore> {
        self.store.clone()
    }

    pub fn ctx(&self) -> RequestContext {
        RequestContext::new(Some(UserId::new(1)), self.clock.as_ref() as &dyn Clock)
    }

    pub async fn tool(&self, code: &str) -> Tool {
        self.tool_with_status(code, ToolStatus::Available).await
    }

    pub async fn tool_with_status(&self, code: &str, status: ToolStatus) -> Tool {
        self.store
            .create_tool(
                &CreateTool {
                    name: format!("Tool {code}"),
                    code: code.to_string(),
                    category: Some("Power Tools".into()),
                    status: Some(status),
                    ..Default::default()
                },
                self.clock.now(),
            )
            .await
            .unwrap()
    }

    pub async fn worker(&self, name: &str, badge: &str) -> Worker {
        self.worker_with_status(name, badge, WorkerStatus::Active).await
    }

    pub async fn worker_with_status(&self, name: &str, badge: &str, status: WorkerStatus) -> Worker {
        self.store
            .create_worker(
                &CreateWorker {
                    name: name.to_string(),
                    badge_number: badge.to_string(),
                    department: Some("Assembly".into()),
                    status: Some(status),
                    ..Default::default()
                },
                self.clock.now(),
            )
            .await
            .unwrap()
    }
}

type Competitor = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Where a competing operation is slotted into a service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Right after a store-level `find_checkout` returns.
    AfterFindCheckout,
    /// Right after a store-level `count_open_checkouts` returns.
    AfterCountOpenCheckouts,
}

/// Store that runs one competing operation to completion in the middle of
/// another service call.
///
/// The competitor runs after the chosen store-level read, or before
/// `begin` if the call under test opens a transaction first. Either way
/// it commits before the call under test writes anything.
pub(crate) struct InterleavingStore {
    inner: Arc<MemoryInventoryStore>,
    slot: Slot,
    competitor: Mutex<Option<Competitor>>,
}

impl InterleavingStore {
    pub fn new(
        inner: Arc<MemoryInventoryStore>,
        slot: Slot,
        competitor: impl Future<Output = ()> + Send + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            inner,
            slot,
            competitor: Mutex::new(Some(Box::pin(competitor))),
        })
    }

    async fn run_competitor(&self) {
        let competitor = self.competitor.lock().await.take();
        if let Some(competitor) = competitor {
            competitor.await;
        }
    }

    async fn run_competitor_at(&self, slot: Slot) {
        if self.slot == slot {
            self.run_competitor().await;
        }
    }
}

impl std::fmt::Debug for InterleavingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterleavingStore").field("slot", &self.slot).finish()
    }
}

#[async_trait]
impl InventoryStore for InterleavingStore {
    async fn begin(&self) -> AppResult<Box<dyn InventoryTransaction>> {
        self.run_competitor().await;
        self.inner.begin().await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn find_tool(&self, id: ToolId) -> AppResult<Option<Tool>> {
        self.inner.find_tool(id).await
    }

    async fn find_tool_by_code(&self, code: &str) -> AppResult<Option<Tool>> {
        self.inner.find_tool_by_code(code).await
    }

    async fn list_tools(&self, filter: &ToolFilter, page: &PageRequest) -> AppResult<PageResponse<Tool>> {
        self.inner.list_tools(filter, page).await
    }

    async fn create_tool(&self, data: &CreateTool, now: DateTime<Utc>) -> AppResult<Tool> {
        self.inner.create_tool(data, now).await
    }

    async fn set_tool_qr_code(&self, id: ToolId, qr_code: Option<&str>, now: DateTime<Utc>) -> AppResult<()> {
        self.inner.set_tool_qr_code(id, qr_code, now).await
    }

    async fn find_worker(&self, id: WorkerId) -> AppResult<Option<Worker>> {
        self.inner.find_worker(id).await
    }

    async fn list_workers(&self, filter: &WorkerFilter, page: &PageRequest) -> AppResult<PageResponse<Worker>> {
        self.inner.list_workers(filter, page).await
    }

    async fn search_active_workers(&self, search: Option<&str>, limit: u32) -> AppResult<Vec<WorkerSummary>> {
        self.inner.search_active_workers(search, limit).await
    }

    async fn create_worker(&self, data: &CreateWorker, now: DateTime<Utc>) -> AppResult<Worker> {
        self.inner.create_worker(data, now).await
    }

    async fn count_open_checkouts(&self, worker_id: WorkerId) -> AppResult<u64> {
        let count = self.inner.count_open_checkouts(worker_id).await;
        self.run_competitor_at(Slot::AfterCountOpenCheckouts).await;
        count
    }

    async fn find_checkout(&self, id: CheckoutId) -> AppResult<Option<Checkout>> {
        let checkout = self.inner.find_checkout(id).await;
        self.run_competitor_at(Slot::AfterFindCheckout).await;
        checkout
    }

    async fn find_checkout_details(&self, id: CheckoutId) -> AppResult<Option<CheckoutDetails>> {
        self.inner.find_checkout_details(id).await
    }

    async fn find_open_checkout_for_tool(&self, tool_id: ToolId) -> AppResult<Option<CheckoutDetails>> {
        self.inner.find_open_checkout_for_tool(tool_id).await
    }

    async fn list_checkouts(
        &self,
        filter: &CheckoutFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckoutDetails>> {
        self.inner.list_checkouts(filter, now, page).await
    }

    async fn refresh_overdue_flags(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.inner.refresh_overdue_flags(now).await
    }
}
