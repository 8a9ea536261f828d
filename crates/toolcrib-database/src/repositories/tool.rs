//! Tool repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use toolcrib_core::result::AppResult;
use toolcrib_core::types::{PageRequest, PageResponse, ToolId};
use toolcrib_entity::tool::{CreateTool, Tool, ToolFilter, ToolStatus};

use super::{db_error, search_pattern};

const FILTER_CLAUSE: &str = "deleted_at IS NULL \
     AND ($1::tool_status IS NULL OR status = $1) \
     AND ($2::text IS NULL OR category = $2) \
     AND ($3::text IS NULL OR name ILIKE $3 OR code ILIKE $3)";

/// Repository for tool reads and administrative writes.
#[derive(Debug, Clone)]
pub struct ToolRepository {
    pool: PgPool,
}

impl ToolRepository {
    /// Create a new tool repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a tool by primary key, soft-deleted rows included.
    pub async fn find_by_id(&self, id: ToolId) -> AppResult<Option<Tool>> {
        sqlx::query_as::<_, Tool>("SELECT * FROM tools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find tool by id"))
    }

    /// Find a tool by its unique code, soft-deleted rows included.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Tool>> {
        sqlx::query_as::<_, Tool>("SELECT * FROM tools WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find tool by code"))
    }

    /// Find several tools by id. Missing ids are skipped.
    pub async fn find_many(&self, ids: &[ToolId]) -> AppResult<Vec<Tool>> {
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        sqlx::query_as::<_, Tool>("SELECT * FROM tools WHERE id = ANY($1)")
            .bind(raw)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load tools"))
    }

    /// List live tools matching `filter`, ordered by name.
    pub async fn list(&self, filter: &ToolFilter, page: &PageRequest) -> AppResult<PageResponse<Tool>> {
        let search = search_pattern(filter.search.as_deref());

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tools WHERE {FILTER_CLAUSE}"))
            .bind(filter.status)
            .bind(filter.category.as_deref())
            .bind(search.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count tools"))?;

        let tools = sqlx::query_as::<_, Tool>(&format!(
            "SELECT * FROM tools WHERE {FILTER_CLAUSE} ORDER BY name ASC, id ASC LIMIT $4 OFFSET $5"
        ))
        .bind(filter.status)
        .bind(filter.category.as_deref())
        .bind(search.as_deref())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list tools"))?;

        Ok(PageResponse::new(tools, page, total as u64))
    }

    /// Insert a new tool.
    pub async fn create(&self, data: &CreateTool, now: DateTime<Utc>) -> AppResult<Tool> {
        sqlx::query_as::<_, Tool>(
            "INSERT INTO tools (name, code, category, description, status, location, \
             purchase_price_cents, purchase_date, manufacturer, model, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.code)
        .bind(&data.category)
        .bind(&data.description)
        .bind(data.status.unwrap_or_default())
        .bind(&data.location)
        .bind(data.purchase_price_cents)
        .bind(data.purchase_date)
        .bind(&data.manufacturer)
        .bind(&data.model)
        .bind(&data.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create tool"))
    }

    /// Record (or clear) the QR image file name of a tool.
    pub async fn set_qr_code(&self, id: ToolId, qr_code: Option<&str>, now: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE tools SET qr_code = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(qr_code)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update tool QR code"))?;
        Ok(())
    }
}

/// Load a tool and hold its row lock until the transaction ends.
pub async fn lock_by_id<'e, E>(executor: E, id: ToolId) -> AppResult<Option<Tool>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Tool>("SELECT * FROM tools WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(db_error("Failed to lock tool"))
}

/// Move a tool to `status`.
pub async fn set_status<'e, E>(executor: E, id: ToolId, status: ToolStatus, now: DateTime<Utc>) -> AppResult<Tool>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Tool>("UPDATE tools SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(status)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(db_error("Failed to update tool status"))
}

/// Persist every editable column of `tool`.
pub async fn update<'e, E>(executor: E, tool: &Tool, now: DateTime<Utc>) -> AppResult<Tool>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Tool>(
        "UPDATE tools SET name = $2, code = $3, category = $4, description = $5, status = $6, \
         location = $7, purchase_price_cents = $8, purchase_date = $9, manufacturer = $10, \
         model = $11, notes = $12, updated_at = $13 WHERE id = $1 RETURNING *",
    )
    .bind(tool.id)
    .bind(&tool.name)
    .bind(&tool.code)
    .bind(&tool.category)
    .bind(&tool.description)
    .bind(tool.status)
    .bind(&tool.location)
    .bind(tool.purchase_price_cents)
    .bind(tool.purchase_date)
    .bind(&tool.manufacturer)
    .bind(&tool.model)
    .bind(&tool.notes)
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(db_error("Failed to update tool"))
}

/// Soft-delete a tool.
pub async fn soft_delete<'e, E>(executor: E, id: ToolId, now: DateTime<Utc>) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query("UPDATE tools SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .bind(now)
        .execute(executor)
        .await
        .map_err(db_error("Failed to delete tool"))?;
    Ok(())
}
