//! Checkout repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::debug;

use toolcrib_core::result::AppResult;
use toolcrib_core::types::{CheckoutId, PageRequest, PageResponse, ToolId, WorkerId};
use toolcrib_entity::checkout::{Checkout, CheckoutFilter, CloseCheckout, NewCheckout};

use super::db_error;

// `overdue` is open AND past due.
const FILTER_CLAUSE: &str = "($1::bigint IS NULL OR tool_id = $1) \
     AND ($2::bigint IS NULL OR worker_id = $2) \
     AND ($3::text IS NULL \
          OR ($3 = 'active' AND returned_at IS NULL) \
          OR ($3 = 'returned' AND returned_at IS NOT NULL) \
          OR ($3 = 'overdue' AND returned_at IS NULL AND expected_return_at < $4))";

/// Repository for checkout reads and bulk overdue maintenance.
#[derive(Debug, Clone)]
pub struct CheckoutRepository {
    pool: PgPool,
}

impl CheckoutRepository {
    /// Create a new checkout repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a checkout by primary key.
    pub async fn find_by_id(&self, id: CheckoutId) -> AppResult<Option<Checkout>> {
        sqlx::query_as::<_, Checkout>("SELECT * FROM checkouts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find checkout by id"))
    }

    /// The open checkout of a tool, if any.
    pub async fn find_open_for_tool(&self, tool_id: ToolId) -> AppResult<Option<Checkout>> {
        sqlx::query_as::<_, Checkout>("SELECT * FROM checkouts WHERE tool_id = $1 AND returned_at IS NULL")
            .bind(tool_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find open checkout"))
    }

    /// Number of open checkouts held by a worker.
    pub async fn count_open_for_worker(&self, worker_id: WorkerId) -> AppResult<u64> {
        count_open_for_worker(&self.pool, worker_id).await
    }

    /// List checkouts matching `filter`, newest first.
    pub async fn list(
        &self,
        filter: &CheckoutFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Checkout>> {
        let state = filter.state.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM checkouts WHERE {FILTER_CLAUSE}"))
            .bind(filter.tool_id)
            .bind(filter.worker_id)
            .bind(state)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count checkouts"))?;

        let checkouts = sqlx::query_as::<_, Checkout>(&format!(
            "SELECT * FROM checkouts WHERE {FILTER_CLAUSE} \
             ORDER BY checked_out_at DESC, id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(filter.tool_id)
        .bind(filter.worker_id)
        .bind(state)
        .bind(now)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list checkouts"))?;

        Ok(PageResponse::new(checkouts, page, total as u64))
    }

    /// Recompute the cached overdue flag of every checkout. Returns the
    /// number of rows whose flag changed.
    pub async fn refresh_overdue(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE checkouts \
             SET is_overdue = (returned_at IS NULL AND expected_return_at IS NOT NULL AND expected_return_at < $1) \
             WHERE is_overdue <> (returned_at IS NULL AND expected_return_at IS NOT NULL AND expected_return_at < $1)",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to refresh overdue flags"))?;

        debug!(changed = result.rows_affected(), "Overdue flags refreshed");
        Ok(result.rows_affected())
    }
}

/// Load a checkout and hold its row lock until the transaction ends.
pub async fn lock_by_id<'e, E>(executor: E, id: CheckoutId) -> AppResult<Option<Checkout>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Checkout>("SELECT * FROM checkouts WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(db_error("Failed to lock checkout"))
}

/// Open a new checkout.
pub async fn insert<'e, E>(executor: E, data: &NewCheckout, now: DateTime<Utc>) -> AppResult<Checkout>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Checkout>(
        "INSERT INTO checkouts (tool_id, worker_id, checked_out_at, expected_return_at, \
         checked_out_by, condition_out, checkout_notes, is_overdue, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8, $8) RETURNING *",
    )
    .bind(data.tool_id)
    .bind(data.worker_id)
    .bind(data.checked_out_at)
    .bind(data.expected_return_at)
    .bind(data.checked_out_by)
    .bind(data.condition_out)
    .bind(&data.checkout_notes)
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(db_error("Failed to create checkout"))
}

/// Close an open checkout and clear its overdue flag.
pub async fn close<'e, E>(executor: E, id: CheckoutId, data: &CloseCheckout, now: DateTime<Utc>) -> AppResult<Checkout>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Checkout>(
        "UPDATE checkouts SET returned_at = $2, returned_by = $3, condition_in = $4, \
         return_notes = $5, is_overdue = FALSE, updated_at = $6 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(data.returned_at)
    .bind(data.returned_by)
    .bind(data.condition_in)
    .bind(&data.return_notes)
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(db_error("Failed to close checkout"))
}

/// Number of open checkouts held by a worker, on any executor.
pub async fn count_open_for_worker<'e, E>(executor: E, worker_id: WorkerId) -> AppResult<u64>
where
    E: PgExecutor<'e>,
{
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM checkouts WHERE worker_id = $1 AND returned_at IS NULL")
            .bind(worker_id)
            .fetch_one(executor)
            .await
            .map_err(db_error("Failed to count open checkouts"))?;
    Ok(count as u64)
}

/// Persist the editable, non-lifecycle columns of `checkout`.
pub async fn update<'e, E>(executor: E, checkout: &Checkout, now: DateTime<Utc>) -> AppResult<Checkout>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Checkout>(
        "UPDATE checkouts SET expected_return_at = $2, checkout_notes = $3, return_notes = $4, \
         is_overdue = $5, updated_at = $6 WHERE id = $1 RETURNING *",
    )
    .bind(checkout.id)
    .bind(checkout.expected_return_at)
    .bind(&checkout.checkout_notes)
    .bind(&checkout.return_notes)
    .bind(checkout.is_overdue)
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(db_error("Failed to update checkout"))
}
