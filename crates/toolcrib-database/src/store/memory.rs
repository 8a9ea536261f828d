//! In-memory inventory store.
//!
//! A transaction holds the store-wide async mutex from `begin` until it is
//! committed or dropped, so transactions are fully serialized. Writes go to
//! a working copy that replaces the shared state on commit; dropping the
//! transaction discards them.
//!
//! Store-level methods take the same mutex, so they must not be called
//! while the same task holds an open transaction.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use toolcrib_core::error::AppError;
use toolcrib_core::result::AppResult;
use toolcrib_core::types::{CheckoutId, PageRequest, PageResponse, ToolId, WorkerId};
use toolcrib_entity::checkout::{
    Checkout, CheckoutDetails, CheckoutFilter, CloseCheckout, NewCheckout,
};
use toolcrib_entity::tool::{CreateTool, Tool, ToolFilter, ToolStatus};
use toolcrib_entity::worker::{CreateWorker, Worker, WorkerFilter, WorkerSummary};

use super::{attach_details, InventoryStore, InventoryTransaction};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    tools: BTreeMap<ToolId, Tool>,
    workers: BTreeMap<WorkerId, Worker>,
    checkouts: BTreeMap<CheckoutId, Checkout>,
    last_tool_id: i64,
    last_worker_id: i64,
    last_checkout_id: i64,
}

impl MemoryState {
    fn ensure_unique_tool_code(&self, code: &str, except: Option<ToolId>) -> AppResult<()> {
        let taken = self
            .tools
            .values()
            .any(|t| t.code == code && Some(t.id) != except);
        if taken {
            return Err(AppError::conflict("tool code already exists"));
        }
        Ok(())
    }

    fn ensure_unique_worker(&self, badge: &str, email: Option<&str>, except: Option<WorkerId>) -> AppResult<()> {
        for worker in self.workers.values().filter(|w| Some(w.id) != except) {
            if worker.badge_number == badge {
                return Err(AppError::conflict("badge number already exists"));
            }
            if email.is_some() && worker.email.as_deref() == email {
                return Err(AppError::conflict("email already exists"));
            }
        }
        Ok(())
    }

    fn open_checkout_for(&self, tool_id: ToolId) -> Option<&Checkout> {
        self.checkouts
            .values()
            .find(|c| c.tool_id == tool_id && c.is_open())
    }

    fn open_checkouts_held_by(&self, worker_id: WorkerId) -> u64 {
        self.checkouts
            .values()
            .filter(|c| c.worker_id == worker_id && c.is_open())
            .count() as u64
    }

    fn details(&self, checkout: &Checkout) -> AppResult<CheckoutDetails> {
        let tools = self.tools.get(&checkout.tool_id).cloned().into_iter().collect();
        let workers = self.workers.get(&checkout.worker_id).cloned().into_iter().collect();
        attach_details(vec![checkout.clone()], tools, workers)?
            .pop()
            .ok_or_else(|| AppError::internal("Checkout details could not be assembled"))
    }

    fn tool_mut(&mut self, id: ToolId) -> AppResult<&mut Tool> {
        self.tools
            .get_mut(&id)
            .ok_or_else(|| AppError::database(format!("Tool {id} does not exist")))
    }
}

/// Inventory store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryInventoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryInventoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn begin(&self) -> AppResult<Box<dyn InventoryTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryInventoryTransaction { guard, working }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn find_tool(&self, id: ToolId) -> AppResult<Option<Tool>> {
        Ok(self.state.lock().await.tools.get(&id).cloned())
    }

    async fn find_tool_by_code(&self, code: &str) -> AppResult<Option<Tool>> {
        let state = self.state.lock().await;
        Ok(state.tools.values().find(|t| t.code == code).cloned())
    }

    async fn list_tools(&self, filter: &ToolFilter, page: &PageRequest) -> AppResult<PageResponse<Tool>> {
        let state = self.state.lock().await;
        let mut tools: Vec<Tool> = state.tools.values().filter(|t| filter.matches(t)).cloned().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(PageResponse::from_slice(tools, page))
    }

    async fn create_tool(&self, data: &CreateTool, now: DateTime<Utc>) -> AppResult<Tool> {
        let mut state = self.state.lock().await;
        state.ensure_unique_tool_code(&data.code, None)?;
        state.last_tool_id += 1;
        let tool = Tool {
            id: ToolId::new(state.last_tool_id),
            name: data.name.clone(),
            code: data.code.clone(),
            qr_code: None,
            category: data.category.clone(),
            description: data.description.clone(),
            status: data.status.unwrap_or_default(),
            location: data.location.clone(),
            purchase_price_cents: data.purchase_price_cents,
            purchase_date: data.purchase_date,
            manufacturer: data.manufacturer.clone(),
            model: data.model.clone(),
            notes: data.notes.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.tools.insert(tool.id, tool.clone());
        Ok(tool)
    }

    async fn set_tool_qr_code(&self, id: ToolId, qr_code: Option<&str>, now: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(tool) = state.tools.get_mut(&id) {
            tool.qr_code = qr_code.map(str::to_string);
            tool.updated_at = now;
        }
        Ok(())
    }

    async fn find_worker(&self, id: WorkerId) -> AppResult<Option<Worker>> {
        Ok(self.state.lock().await.workers.get(&id).cloned())
    }

    async fn list_workers(&self, filter: &WorkerFilter, page: &PageRequest) -> AppResult<PageResponse<Worker>> {
        let state = self.state.lock().await;
        let mut workers: Vec<Worker> = state.workers.values().filter(|w| filter.matches(w)).cloned().collect();
        workers.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(PageResponse::from_slice(workers, page))
    }

    async fn search_active_workers(&self, search: Option<&str>, limit: u32) -> AppResult<Vec<WorkerSummary>> {
        let filter = WorkerFilter::active_matching(search);
        let state = self.state.lock().await;
        let mut workers: Vec<&Worker> = state.workers.values().filter(|w| filter.matches(w)).collect();
        workers.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(workers.into_iter().take(limit as usize).map(Worker::summary).collect())
    }

    async fn create_worker(&self, data: &CreateWorker, now: DateTime<Utc>) -> AppResult<Worker> {
        let mut state = self.state.lock().await;
        state.ensure_unique_worker(&data.badge_number, data.email.as_deref(), None)?;
        state.last_worker_id += 1;
        let worker = Worker {
            id: WorkerId::new(state.last_worker_id),
            name: data.name.clone(),
            badge_number: data.badge_number.clone(),
            email: data.email.clone(),
            phone: data.phone.clone(),
            department: data.department.clone(),
            position: data.position.clone(),
            status: data.status.unwrap_or_default(),
            notes: data.notes.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.workers.insert(worker.id, worker.clone());
        Ok(worker)
    }

    async fn count_open_checkouts(&self, worker_id: WorkerId) -> AppResult<u64> {
        Ok(self.state.lock().await.open_checkouts_held_by(worker_id))
    }

    async fn find_checkout(&self, id: CheckoutId) -> AppResult<Option<Checkout>> {
        Ok(self.state.lock().await.checkouts.get(&id).cloned())
    }

    async fn find_checkout_details(&self, id: CheckoutId) -> AppResult<Option<CheckoutDetails>> {
        let state = self.state.lock().await;
        state.checkouts.get(&id).map(|c| state.details(c)).transpose()
    }

    async fn find_open_checkout_for_tool(&self, tool_id: ToolId) -> AppResult<Option<CheckoutDetails>> {
        let state = self.state.lock().await;
        state.open_checkout_for(tool_id).map(|c| state.details(c)).transpose()
    }

    async fn list_checkouts(
        &self,
        filter: &CheckoutFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckoutDetails>> {
        let state = self.state.lock().await;
        let mut checkouts: Vec<Checkout> = state
            .checkouts
            .values()
            .filter(|c| filter.matches(c, now))
            .cloned()
            .collect();
        checkouts.sort_by(|a, b| b.checked_out_at.cmp(&a.checked_out_at).then(b.id.cmp(&a.id)));

        let listed = PageResponse::from_slice(checkouts, page);
        let tools = state.tools.values().cloned().collect();
        let workers = state.workers.values().cloned().collect();
        let items = attach_details(listed.items, tools, workers)?;
        Ok(PageResponse::new(items, page, listed.total_items))
    }

    async fn refresh_overdue_flags(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut changed = 0;
        for checkout in state.checkouts.values_mut() {
            if checkout.overdue_cache_is_stale(now) {
                checkout.is_overdue = checkout.is_overdue_at(now);
                changed += 1;
            }
        }
        Ok(changed)
    }
}

/// Serialized in-memory transaction.
pub struct MemoryInventoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl InventoryTransaction for MemoryInventoryTransaction {
    async fn lock_tool(&mut self, id: ToolId) -> AppResult<Option<Tool>> {
        Ok(self.working.tools.get(&id).cloned())
    }

    async fn find_worker(&mut self, id: WorkerId) -> AppResult<Option<Worker>> {
        Ok(self.working.workers.get(&id).cloned())
    }

    async fn lock_worker(&mut self, id: WorkerId) -> AppResult<Option<Worker>> {
        Ok(self.working.workers.get(&id).cloned())
    }

    async fn count_open_checkouts(&mut self, worker_id: WorkerId) -> AppResult<u64> {
        Ok(self.working.open_checkouts_held_by(worker_id))
    }

    async fn update_worker(&mut self, worker: &Worker, now: DateTime<Utc>) -> AppResult<Worker> {
        let state = &mut self.working;
        state.ensure_unique_worker(&worker.badge_number, worker.email.as_deref(), Some(worker.id))?;
        let stored = state
            .workers
            .get_mut(&worker.id)
            .ok_or_else(|| AppError::database(format!("Worker {} does not exist", worker.id)))?;
        *stored = Worker {
            created_at: stored.created_at,
            deleted_at: stored.deleted_at,
            updated_at: now,
            ..worker.clone()
        };
        Ok(stored.clone())
    }

    async fn soft_delete_worker(&mut self, id: WorkerId, now: DateTime<Utc>) -> AppResult<()> {
        if let Some(worker) = self.working.workers.get_mut(&id).filter(|w| !w.is_deleted()) {
            worker.deleted_at = Some(now);
            worker.updated_at = now;
        }
        Ok(())
    }

    async fn lock_checkout(&mut self, id: CheckoutId) -> AppResult<Option<Checkout>> {
        Ok(self.working.checkouts.get(&id).cloned())
    }

    async fn has_open_checkout(&mut self, tool_id: ToolId) -> AppResult<bool> {
        Ok(self.working.open_checkout_for(tool_id).is_some())
    }

    async fn insert_checkout(&mut self, data: &NewCheckout, now: DateTime<Utc>) -> AppResult<Checkout> {
        let state = &mut self.working;
        if !state.tools.contains_key(&data.tool_id) {
            return Err(AppError::database(format!("Tool {} does not exist", data.tool_id)));
        }
        if !state.workers.contains_key(&data.worker_id) {
            return Err(AppError::database(format!("Worker {} does not exist", data.worker_id)));
        }
        if state.open_checkout_for(data.tool_id).is_some() {
            return Err(AppError::conflict("tool already has an open checkout"));
        }

        state.last_checkout_id += 1;
        let checkout = Checkout {
            id: CheckoutId::new(state.last_checkout_id),
            tool_id: data.tool_id,
            worker_id: data.worker_id,
            checked_out_at: data.checked_out_at,
            expected_return_at: data.expected_return_at,
            returned_at: None,
            checked_out_by: data.checked_out_by,
            returned_by: None,
            condition_out: data.condition_out,
            condition_in: None,
            checkout_notes: data.checkout_notes.clone(),
            return_notes: None,
            is_overdue: false,
            created_at: now,
            updated_at: now,
        };
        state.checkouts.insert(checkout.id, checkout.clone());
        Ok(checkout)
    }

    async fn close_checkout(
        &mut self,
        id: CheckoutId,
        data: &CloseCheckout,
        now: DateTime<Utc>,
    ) -> AppResult<Checkout> {
        let checkout = self
            .working
            .checkouts
            .get_mut(&id)
            .ok_or_else(|| AppError::database(format!("Checkout {id} does not exist")))?;
        data.apply_to(checkout);
        checkout.updated_at = now;
        Ok(checkout.clone())
    }

    async fn update_checkout(&mut self, checkout: &Checkout, now: DateTime<Utc>) -> AppResult<Checkout> {
        let stored = self
            .working
            .checkouts
            .get_mut(&checkout.id)
            .ok_or_else(|| AppError::database(format!("Checkout {} does not exist", checkout.id)))?;
        stored.expected_return_at = checkout.expected_return_at;
        stored.checkout_notes = checkout.checkout_notes.clone();
        stored.return_notes = checkout.return_notes.clone();
        stored.is_overdue = checkout.is_overdue;
        stored.updated_at = now;
        Ok(stored.clone())
    }

    async fn set_tool_status(&mut self, id: ToolId, status: ToolStatus, now: DateTime<Utc>) -> AppResult<Tool> {
        let tool = self.working.tool_mut(id)?;
        tool.status = status;
        tool.updated_at = now;
        Ok(tool.clone())
    }

    async fn update_tool(&mut self, tool: &Tool, now: DateTime<Utc>) -> AppResult<Tool> {
        self.working.ensure_unique_tool_code(&tool.code, Some(tool.id))?;
        let stored = self.working.tool_mut(tool.id)?;
        *stored = Tool {
            qr_code: stored.qr_code.clone(),
            created_at: stored.created_at,
            deleted_at: stored.deleted_at,
            updated_at: now,
            ..tool.clone()
        };
        Ok(stored.clone())
    }

    async fn soft_delete_tool(&mut self, id: ToolId, now: DateTime<Utc>) -> AppResult<()> {
        let tool = self.working.tool_mut(id)?;
        if !tool.is_deleted() {
            tool.deleted_at = Some(now);
            tool.updated_at = now;
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryInventoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use toolcrib_core::ErrorKind;
    use toolcrib_entity::checkout::Condition;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap()
    }

    async fn seeded() -> (MemoryInventoryStore, Tool, Worker) {
        let store = MemoryInventoryStore::new();
        let tool = store
            .create_tool(
                &CreateTool {
                    name: "Cordless Drill".into(),
                    code: "DRILL-001".into(),
                    ..Default::default()
                },
                now(),
            )
            .await
            .unwrap();
        let worker = store
            .create_worker(
                &CreateWorker {
                    name: "Ada Byers".into(),
                    badge_number: "B-100".into(),
                    ..Default::default()
                },
                now(),
            )
            .await
            .unwrap();
        (store, tool, worker)
    }

    fn new_checkout(tool: &Tool, worker: &Worker) -> NewCheckout {
        NewCheckout {
            tool_id: tool.id,
            worker_id: worker.id,
            checked_out_at: now(),
            expected_return_at: None,
            checked_out_by: None,
            condition_out: Condition::Good,
            checkout_notes: None,
        }
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let (store, tool, worker) = seeded().await;
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_checkout(&new_checkout(&tool, &worker), now()).await.unwrap();
            tx.set_tool_status(tool.id, ToolStatus::CheckedOut, now()).await.unwrap();
        }
        assert!(store.find_open_checkout_for_tool(tool.id).await.unwrap().is_none());
        assert_eq!(store.find_tool(tool.id).await.unwrap().unwrap().status, ToolStatus::Available);
    }

    #[tokio::test]
    async fn test_worker_delete_in_transaction_sees_open_checkouts() {
        let (store, tool, worker) = seeded().await;
        let mut tx = store.begin().await.unwrap();
        tx.insert_checkout(&new_checkout(&tool, &worker), now()).await.unwrap();
        assert_eq!(tx.count_open_checkouts(worker.id).await.unwrap(), 1);
        tx.soft_delete_worker(worker.id, now()).await.unwrap();
        drop(tx);

        assert_eq!(store.count_open_checkouts(worker.id).await.unwrap(), 0);
        assert!(!store.find_worker(worker.id).await.unwrap().unwrap().is_deleted());
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let (store, tool, worker) = seeded().await;
        let mut tx = store.begin().await.unwrap();
        let checkout = tx.insert_checkout(&new_checkout(&tool, &worker), now()).await.unwrap();
        tx.commit().await.unwrap();

        let details = store.find_checkout_details(checkout.id).await.unwrap().unwrap();
        assert_eq!(details.tool.code, "DRILL-001");
        assert_eq!(details.worker.badge_number, "B-100");
    }

    #[tokio::test]
    async fn test_second_open_checkout_conflicts() {
        let (store, tool, worker) = seeded().await;
        let mut tx = store.begin().await.unwrap();
        tx.insert_checkout(&new_checkout(&tool, &worker), now()).await.unwrap();
        let err = tx.insert_checkout(&new_checkout(&tool, &worker), now()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_unique_codes_and_badges() {
        let (store, _, _) = seeded().await;
        let err = store
            .create_tool(
                &CreateTool {
                    name: "Other".into(),
                    code: "DRILL-001".into(),
                    ..Default::default()
                },
                now(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = store
            .create_worker(
                &CreateWorker {
                    name: "Other".into(),
                    badge_number: "B-100".into(),
                    ..Default::default()
                },
                now(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_search_active_workers_orders_and_limits() {
        let store = MemoryInventoryStore::new();
        for (name, badge, status) in [
            ("Zed", "B-3", None),
            ("Amy", "B-1", None),
            ("Moe", "B-2", Some(toolcrib_entity::WorkerStatus::Inactive)),
            ("Bob", "B-4", None),
        ] {
            store
                .create_worker(
                    &CreateWorker {
                        name: name.into(),
                        badge_number: badge.into(),
                        status,
                        ..Default::default()
                    },
                    now(),
                )
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .search_active_workers(None, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.name)
            .collect();
        assert_eq!(names, vec!["Amy", "Bob"]);

        let by_badge = store.search_active_workers(Some("b-3"), 50).await.unwrap();
        assert_eq!(by_badge.len(), 1);
        assert_eq!(by_badge[0].name, "Zed");
    }

    #[tokio::test]
    async fn test_refresh_overdue_counts_changes() {
        let (store, tool, worker) = seeded().await;
        let mut tx = store.begin().await.unwrap();
        let mut data = new_checkout(&tool, &worker);
        data.expected_return_at = Some(now() + chrono::Duration::hours(2));
        tx.insert_checkout(&data, now()).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.refresh_overdue_flags(now()).await.unwrap(), 0);
        let later = now() + chrono::Duration::hours(3);
        assert_eq!(store.refresh_overdue_flags(later).await.unwrap(), 1);
        assert_eq!(store.refresh_overdue_flags(later).await.unwrap(), 0);
    }
}
