//! Checkout lifecycle service.

use std::sync::Arc;

use tracing::{debug, info, warn};

use toolcrib_core::error::AppError;
use toolcrib_core::result::AppResult;
use toolcrib_core::types::{CheckoutId, PageRequest, PageResponse};
use toolcrib_database::InventoryStore;
use toolcrib_entity::checkout::{
    Checkout, CheckoutDetails, CheckoutFilter, CloseCheckout, NewCheckout, UpdateCheckout,
};
use toolcrib_entity::tool::ToolStatus;

use super::data::{CheckoutData, ReturnData};
use crate::context::RequestContext;

/// Opens and closes checkouts and keeps tool status in step.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    store: Arc<dyn InventoryStore>,
}

impl CheckoutService {
    /// Creates a new checkout service.
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Hand a tool to a worker.
    ///
    /// The tool row stays locked for the whole transaction, so of two
    /// concurrent checkouts of one tool exactly one succeeds; the other
    /// observes `checked_out` and fails with `InvalidState`. The worker row
    /// is locked after the tool, so a worker cannot be deactivated or
    /// deleted between the status check and the insert.
    pub async fn checkout_tool(&self, ctx: &RequestContext, data: CheckoutData) -> AppResult<CheckoutDetails> {
        let checked_out_at = data.checked_out_at.unwrap_or(ctx.request_time);
        if let Some(expected) = data.expected_return_at {
            if expected < checked_out_at {
                return Err(AppError::invalid_field(
                    "expected_return_at",
                    "expected return must not be before the checkout time",
                ));
            }
        }

        let mut tx = self.store.begin().await?;

        let tool = tx
            .lock_tool(data.tool_id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Tool {} not found", data.tool_id)))?;
        if !tool.is_available() {
            warn!(tool_id = %tool.id, code = %tool.code, status = %tool.status, "Checkout rejected: tool not available");
            return Err(AppError::invalid_state("tool not available"));
        }

        let worker = tx
            .lock_worker(data.worker_id)
            .await?
            .filter(|w| !w.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Worker {} not found", data.worker_id)))?;
        if !worker.is_active() {
            warn!(worker_id = %worker.id, status = %worker.status, "Checkout rejected: worker not active");
            return Err(AppError::invalid_state("worker not active"));
        }

        let checkout = tx
            .insert_checkout(
                &NewCheckout {
                    tool_id: tool.id,
                    worker_id: worker.id,
                    checked_out_at,
                    expected_return_at: data.expected_return_at,
                    checked_out_by: ctx.actor_id,
                    condition_out: data.condition_out.unwrap_or_default(),
                    checkout_notes: data.checkout_notes,
                },
                ctx.request_time,
            )
            .await?;
        let tool = tx
            .set_tool_status(tool.id, ToolStatus::CheckedOut, ctx.request_time)
            .await?;
        tx.commit().await?;

        info!(
            checkout_id = %checkout.id,
            tool_id = %tool.id,
            code = %tool.code,
            worker_id = %worker.id,
            "Tool checked out"
        );

        Ok(CheckoutDetails { checkout, tool, worker })
    }

    /// Close a checkout. Tools returned in fair or poor condition go to
    /// maintenance; all others become available again.
    pub async fn return_tool(&self, ctx: &RequestContext, data: ReturnData) -> AppResult<CheckoutDetails> {
        let mut tx = self.store.begin().await?;

        let checkout = tx
            .lock_checkout(data.checkout_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Checkout {} not found", data.checkout_id)))?;
        if checkout.is_returned() {
            warn!(checkout_id = %checkout.id, "Return rejected: already returned");
            return Err(AppError::invalid_state("already returned"));
        }

        let returned_at = data.returned_at.unwrap_or(ctx.request_time);
        if returned_at < checkout.checked_out_at {
            return Err(AppError::invalid_field(
                "returned_at",
                "return time must not be before the checkout time",
            ));
        }

        let condition_in = data.condition_in.unwrap_or_default();
        let checkout = tx
            .close_checkout(
                checkout.id,
                &CloseCheckout {
                    returned_at,
                    returned_by: ctx.actor_id,
                    condition_in,
                    return_notes: data.return_notes,
                },
                ctx.request_time,
            )
            .await?;

        // Lock order is checkout then tool.
        tx.lock_tool(checkout.tool_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Tool {} of checkout {} is missing", checkout.tool_id, checkout.id)))?;
        let tool = tx
            .set_tool_status(checkout.tool_id, ToolStatus::after_return(condition_in), ctx.request_time)
            .await?;
        let worker = tx
            .find_worker(checkout.worker_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!("Worker {} of checkout {} is missing", checkout.worker_id, checkout.id))
            })?;
        tx.commit().await?;

        info!(
            checkout_id = %checkout.id,
            tool_id = %tool.id,
            condition = %condition_in,
            tool_status = %tool.status,
            "Tool returned"
        );

        Ok(CheckoutDetails { checkout, tool, worker })
    }

    /// Load one checkout with its tool and worker.
    pub async fn get_checkout(&self, id: CheckoutId) -> AppResult<CheckoutDetails> {
        self.store
            .find_checkout_details(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Checkout {id} not found")))
    }

    /// List checkouts, newest first. `overdue` is evaluated at the request
    /// time, not from the cached flag.
    pub async fn list_checkouts(
        &self,
        ctx: &RequestContext,
        filter: &CheckoutFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<CheckoutDetails>> {
        debug!(?filter, page = page.page, "Listing checkouts");
        self.store.list_checkouts(filter, ctx.request_time, &page).await
    }

    /// Edit the due time or notes of a checkout.
    ///
    /// The checkout row is locked for the edit, so a concurrent return is
    /// either fully visible to it or waits for it.
    pub async fn update_checkout(
        &self,
        ctx: &RequestContext,
        id: CheckoutId,
        update: UpdateCheckout,
    ) -> AppResult<Checkout> {
        let mut tx = self.store.begin().await?;

        let mut checkout = tx
            .lock_checkout(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Checkout {id} not found")))?;

        if let Some(expected) = update.expected_return_at {
            if expected < checkout.checked_out_at {
                return Err(AppError::invalid_field(
                    "expected_return_at",
                    "expected return must not be before the checkout time",
                ));
            }
        }

        update.apply_to(&mut checkout);
        checkout.is_overdue = checkout.is_overdue_at(ctx.request_time);
        let checkout = tx.update_checkout(&checkout, ctx.request_time).await?;
        tx.commit().await?;

        info!(checkout_id = %checkout.id, actor = ?ctx.actor_id, "Checkout updated");
        Ok(checkout)
    }

    /// Recompute every cached overdue flag at the request time. Returns the
    /// number of checkouts whose flag changed.
    pub async fn refresh_overdue(&self, ctx: &RequestContext) -> AppResult<u64> {
        let changed = self.store.refresh_overdue_flags(ctx.request_time).await?;
        info!(changed, at = %ctx.request_time, "Overdue flags refreshed");
        Ok(changed)
    }
}
