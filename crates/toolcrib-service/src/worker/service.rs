//! Worker administration service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use toolcrib_core::error::{AppError, FieldErrors};
use toolcrib_core::result::AppResult;
use toolcrib_core::types::{PageRequest, PageResponse, WorkerId};
use toolcrib_database::{InventoryStore, InventoryTransaction};
use toolcrib_entity::worker::{CreateWorker, UpdateWorker, Worker, WorkerFilter};

use crate::context::RequestContext;

/// A worker with live checkout statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerDetails {
    /// The worker row.
    #[serde(flatten)]
    pub worker: Worker,
    /// Number of tools the worker currently holds.
    pub active_checkouts_count: u64,
}

/// CRUD over the workforce roster.
#[derive(Debug, Clone)]
pub struct WorkerService {
    store: Arc<dyn InventoryStore>,
}

impl WorkerService {
    /// Creates a new worker service.
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// List live workers.
    pub async fn list_workers(&self, filter: &WorkerFilter, page: PageRequest) -> AppResult<PageResponse<Worker>> {
        self.store.list_workers(filter, &page).await
    }

    /// Load a live worker with the number of tools they hold.
    pub async fn get_worker(&self, id: WorkerId) -> AppResult<WorkerDetails> {
        let worker = self.find_live(id).await?;
        let active_checkouts_count = self.store.count_open_checkouts(id).await?;
        Ok(WorkerDetails {
            worker,
            active_checkouts_count,
        })
    }

    /// Register a new worker.
    pub async fn create_worker(&self, ctx: &RequestContext, mut data: CreateWorker) -> AppResult<Worker> {
        data.name = data.name.trim().to_string();
        data.badge_number = data.badge_number.trim().to_string();
        data.email = normalize_email(data.email);

        let mut fields = FieldErrors::new();
        if data.name.is_empty() {
            fields.entry("name".into()).or_default().push("name is required".into());
        }
        if data.badge_number.is_empty() {
            fields
                .entry("badge_number".into())
                .or_default()
                .push("badge number is required".into());
        }
        if !fields.is_empty() {
            return Err(AppError::validation_fields("Validation failed", fields));
        }

        let worker = self.store.create_worker(&data, ctx.request_time).await?;
        info!(worker_id = %worker.id, badge = %worker.badge_number, actor = ?ctx.actor_id, "Worker created");
        Ok(worker)
    }

    /// Edit a worker, including their status.
    pub async fn update_worker(&self, ctx: &RequestContext, id: WorkerId, mut update: UpdateWorker) -> AppResult<Worker> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::invalid_field("name", "name is required"));
        }
        if update.badge_number.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(AppError::invalid_field("badge_number", "badge number is required"));
        }
        update.email = normalize_email(update.email);

        let mut tx = self.store.begin().await?;
        let mut worker = lock_live(tx.as_mut(), id).await?;
        update.apply_to(&mut worker);
        worker.name = worker.name.trim().to_string();
        worker.badge_number = worker.badge_number.trim().to_string();

        let worker = tx.update_worker(&worker, ctx.request_time).await?;
        tx.commit().await?;
        info!(worker_id = %worker.id, status = %worker.status, actor = ?ctx.actor_id, "Worker updated");
        Ok(worker)
    }

    /// Soft-delete a worker. Refused while they hold tools.
    ///
    /// The count and the delete run under the worker's row lock, which
    /// checkouts also take, so no checkout can open in between.
    pub async fn delete_worker(&self, ctx: &RequestContext, id: WorkerId) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        let worker = lock_live(tx.as_mut(), id).await?;
        let open = tx.count_open_checkouts(id).await?;
        if open > 0 {
            return Err(AppError::invalid_state(format!(
                "worker holds {open} open checkout(s)"
            )));
        }

        tx.soft_delete_worker(id, ctx.request_time).await?;
        tx.commit().await?;
        info!(worker_id = %id, badge = %worker.badge_number, actor = ?ctx.actor_id, "Worker deleted");
        Ok(())
    }

    async fn find_live(&self, id: WorkerId) -> AppResult<Worker> {
        self.store
            .find_worker(id)
            .await?
            .filter(|w| !w.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Worker {id} not found")))
    }
}

async fn lock_live(tx: &mut dyn InventoryTransaction, id: WorkerId) -> AppResult<Worker> {
    tx.lock_worker(id)
        .await?
        .filter(|w| !w.is_deleted())
        .ok_or_else(|| AppError::not_found(format!("Worker {id} not found")))
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolcrib_core::ErrorKind;
    use toolcrib_entity::worker::WorkerStatus;

    use crate::checkout::{CheckoutData, CheckoutService, ReturnData};
    use crate::testing::{Fixture, InterleavingStore, Slot};

    #[tokio::test]
    async fn test_create_and_duplicate_badge() {
        let fx = Fixture::new();
        let svc = WorkerService::new(fx.dyn_store());
        let data = CreateWorker {
            name: " Jordan Lee ".into(),
            badge_number: "B-007".into(),
            email: Some("  ".into()),
            ..Default::default()
        };

        let worker = svc.create_worker(&fx.ctx(), data.clone()).await.unwrap();
        assert_eq!(worker.name, "Jordan Lee");
        assert_eq!(worker.email, None);
        assert_eq!(worker.status, WorkerStatus::Active);

        let err = svc.create_worker(&fx.ctx(), data).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_get_counts_open_checkouts_and_delete_is_guarded() {
        let fx = Fixture::new();
        let svc = WorkerService::new(fx.dyn_store());
        let checkouts = CheckoutService::new(fx.dyn_store());
        let tool = fx.tool("DRILL-001").await;
        let worker = fx.worker("Jordan Lee", "B-007").await;

        let opened = checkouts
            .checkout_tool(&fx.ctx(), CheckoutData::new(tool.id, worker.id))
            .await
            .unwrap();
        assert_eq!(svc.get_worker(worker.id).await.unwrap().active_checkouts_count, 1);

        let err = svc.delete_worker(&fx.ctx(), worker.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);

        checkouts
            .return_tool(&fx.ctx(), ReturnData::new(opened.checkout.id))
            .await
            .unwrap();
        svc.delete_worker(&fx.ctx(), worker.id).await.unwrap();
        assert_eq!(svc.get_worker(worker.id).await.unwrap_err().kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_suspending_blocks_new_checkouts() {
        let fx = Fixture::new();
        let svc = WorkerService::new(fx.dyn_store());
        let tool = fx.tool("DRILL-001").await;
        let worker = fx.worker("Jordan Lee", "B-007").await;

        let updated = svc
            .update_worker(
                &fx.ctx(),
                worker.id,
                UpdateWorker {
                    status: Some(WorkerStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_active());

        let err = CheckoutService::new(fx.dyn_store())
            .checkout_tool(&fx.ctx(), CheckoutData::new(tool.id, worker.id))
            .await
            .unwrap_err();
        assert_eq!(err.message, "worker not active");
    }

    #[tokio::test]
    async fn test_delete_racing_a_checkout_is_refused() {
        let fx = Fixture::new();
        let tool = fx.tool("DRILL-001").await;
        let worker = fx.worker("Jordan Lee", "B-007").await;

        let checkouts = CheckoutService::new(fx.dyn_store());
        let ctx = fx.ctx();
        let data = CheckoutData::new(tool.id, worker.id);
        let store = InterleavingStore::new(fx.store.clone(), Slot::AfterCountOpenCheckouts, async move {
            checkouts.checkout_tool(&ctx, data).await.unwrap();
        });

        let err = WorkerService::new(store)
            .delete_worker(&fx.ctx(), worker.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
        assert_eq!(err.message, "worker holds 1 open checkout(s)");

        let stored = fx.store.find_worker(worker.id).await.unwrap().unwrap();
        assert!(!stored.is_deleted());
        assert_eq!(fx.store.count_open_checkouts(worker.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_on_deleted_worker_is_not_found() {
        let fx = Fixture::new();
        let svc = WorkerService::new(fx.dyn_store());
        let worker = fx.worker("Jordan Lee", "B-007").await;
        svc.delete_worker(&fx.ctx(), worker.id).await.unwrap();

        let err = svc
            .update_worker(
                &fx.ctx(),
                worker.id,
                UpdateWorker {
                    status: Some(WorkerStatus::Active),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
