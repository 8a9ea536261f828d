//! Tool administration service.

use std::sync::Arc;

use tracing::{info, warn};

use toolcrib_core::error::{AppError, FieldErrors};
use toolcrib_core::result::AppResult;
use toolcrib_core::types::{PageRequest, PageResponse, ToolId};
use toolcrib_database::InventoryStore;
use toolcrib_entity::tool::{CreateTool, Tool, ToolFilter, ToolStatus, UpdateTool};

use crate::context::RequestContext;

/// CRUD over the tool catalogue.
#[derive(Debug, Clone)]
pub struct ToolService {
    store: Arc<dyn InventoryStore>,
}

impl ToolService {
    /// Creates a new tool service.
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// List live tools.
    pub async fn list_tools(&self, filter: &ToolFilter, page: PageRequest) -> AppResult<PageResponse<Tool>> {
        self.store.list_tools(filter, &page).await
    }

    /// Load a live tool.
    pub async fn get_tool(&self, id: ToolId) -> AppResult<Tool> {
        self.store
            .find_tool(id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Tool {id} not found")))
    }

    /// Register a new tool.
    pub async fn create_tool(&self, ctx: &RequestContext, mut data: CreateTool) -> AppResult<Tool> {
        data.name = data.name.trim().to_string();
        data.code = data.code.trim().to_string();

        let mut fields = FieldErrors::new();
        if data.name.is_empty() {
            fields.entry("name".into()).or_default().push("name is required".into());
        }
        if data.code.is_empty() {
            fields.entry("code".into()).or_default().push("code is required".into());
        }
        if data.purchase_price_cents.is_some_and(|p| p < 0) {
            fields
                .entry("purchase_price_cents".into())
                .or_default()
                .push("purchase price must not be negative".into());
        }
        if !fields.is_empty() {
            return Err(AppError::validation_fields("Validation failed", fields));
        }
        if data.status.is_some_and(|s| !s.is_admin_assignable()) {
            return Err(AppError::invalid_state("a new tool cannot start checked out"));
        }

        let tool = self.store.create_tool(&data, ctx.request_time).await?;
        info!(tool_id = %tool.id, code = %tool.code, actor = ?ctx.actor_id, "Tool created");
        Ok(tool)
    }

    /// Edit a tool.
    ///
    /// Status edits may only target available, maintenance or retired, and
    /// are refused while the tool has an open checkout.
    pub async fn update_tool(&self, ctx: &RequestContext, id: ToolId, update: UpdateTool) -> AppResult<Tool> {
        if update.purchase_price_cents.is_some_and(|p| p < 0) {
            return Err(AppError::invalid_field(
                "purchase_price_cents",
                "purchase price must not be negative",
            ));
        }
        if update.code.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(AppError::invalid_field("code", "code is required"));
        }
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::invalid_field("name", "name is required"));
        }

        let mut tx = self.store.begin().await?;
        let mut tool = tx
            .lock_tool(id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Tool {id} not found")))?;

        if let Some(status) = update.status.filter(|s| *s != tool.status) {
            if !status.is_admin_assignable() {
                return Err(AppError::invalid_state(
                    "status checked_out can only be set by checking the tool out",
                ));
            }
            if tool.is_checked_out() || tx.has_open_checkout(id).await? {
                warn!(tool_id = %id, requested = %status, "Status edit rejected: tool has an open checkout");
                return Err(AppError::invalid_state("tool has an open checkout"));
            }
        }

        update.apply_to(&mut tool);
        tool.name = tool.name.trim().to_string();
        tool.code = tool.code.trim().to_string();
        let tool = tx.update_tool(&tool, ctx.request_time).await?;
        tx.commit().await?;

        info!(tool_id = %tool.id, status = %tool.status, actor = ?ctx.actor_id, "Tool updated");
        Ok(tool)
    }

    /// Soft-delete a tool. Refused while the tool is checked out.
    pub async fn delete_tool(&self, ctx: &RequestContext, id: ToolId) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        let tool = tx
            .lock_tool(id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Tool {id} not found")))?;

        if tool.status == ToolStatus::CheckedOut || tx.has_open_checkout(id).await? {
            return Err(AppError::invalid_state("tool is checked out"));
        }

        tx.soft_delete_tool(id, ctx.request_time).await?;
        tx.commit().await?;

        info!(tool_id = %id, code = %tool.code, actor = ?ctx.actor_id, "Tool deleted");
        Ok(())
    }
}
