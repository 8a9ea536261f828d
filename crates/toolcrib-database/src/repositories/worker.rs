//! Worker repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use toolcrib_core::result::AppResult;
use toolcrib_core::types::{PageRequest, PageResponse, WorkerId};
use toolcrib_entity::worker::{CreateWorker, Worker, WorkerFilter, WorkerSummary};

use super::{db_error, search_pattern};

const FILTER_CLAUSE: &str = "deleted_at IS NULL \
     AND ($1::worker_status IS NULL OR status = $1) \
     AND ($2::text IS NULL OR department = $2) \
     AND ($3::text IS NULL OR name ILIKE $3 OR badge_number ILIKE $3)";

/// Repository for worker reads and administrative writes.
#[derive(Debug, Clone)]
pub struct WorkerRepository {
    pool: PgPool,
}

impl WorkerRepository {
    /// Create a new worker repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a worker by primary key, soft-deleted rows included.
    pub async fn find_by_id(&self, id: WorkerId) -> AppResult<Option<Worker>> {
        find_by_id(&self.pool, id).await
    }

    /// Find several workers by id. Missing ids are skipped.
    pub async fn find_many(&self, ids: &[WorkerId]) -> AppResult<Vec<Worker>> {
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE id = ANY($1)")
            .bind(raw)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load workers"))
    }

    /// List live workers matching `filter`, ordered by name.
    pub async fn list(&self, filter: &WorkerFilter, page: &PageRequest) -> AppResult<PageResponse<Worker>> {
        let search = search_pattern(filter.search.as_deref());

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM workers WHERE {FILTER_CLAUSE}"))
            .bind(filter.status)
            .bind(filter.department.as_deref())
            .bind(search.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count workers"))?;

        let workers = sqlx::query_as::<_, Worker>(&format!(
            "SELECT * FROM workers WHERE {FILTER_CLAUSE} ORDER BY name ASC, id ASC LIMIT $4 OFFSET $5"
        ))
        .bind(filter.status)
        .bind(filter.department.as_deref())
        .bind(search.as_deref())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list workers"))?;

        Ok(PageResponse::new(workers, page, total as u64))
    }

    /// Active workers whose name or badge matches `search`, ordered by name.
    pub async fn search_active(&self, search: Option<&str>, limit: u32) -> AppResult<Vec<WorkerSummary>> {
        sqlx::query_as::<_, WorkerSummary>(
            "SELECT id, name, badge_number, department FROM workers \
             WHERE deleted_at IS NULL AND status = 'active' \
             AND ($1::text IS NULL OR name ILIKE $1 OR badge_number ILIKE $1) \
             ORDER BY name ASC, id ASC LIMIT $2",
        )
        .bind(search_pattern(search))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to search workers"))
    }

    /// Insert a new worker.
    pub async fn create(&self, data: &CreateWorker, now: DateTime<Utc>) -> AppResult<Worker> {
        sqlx::query_as::<_, Worker>(
            "INSERT INTO workers (name, badge_number, email, phone, department, position, status, \
             notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.badge_number)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.department)
        .bind(&data.position)
        .bind(data.status.unwrap_or_default())
        .bind(&data.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create worker"))
    }
}

/// Find a worker by primary key on any executor.
pub async fn find_by_id<'e, E>(executor: E, id: WorkerId) -> AppResult<Option<Worker>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(db_error("Failed to find worker by id"))
}

/// Load a worker and hold its row lock until the transaction ends.
pub async fn lock_by_id<'e, E>(executor: E, id: WorkerId) -> AppResult<Option<Worker>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(db_error("Failed to lock worker"))
}

/// Persist every editable column of `worker`.
pub async fn update<'e, E>(executor: E, worker: &Worker, now: DateTime<Utc>) -> AppResult<Worker>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Worker>(
        "UPDATE workers SET name = $2, badge_number = $3, email = $4, phone = $5, \
         department = $6, position = $7, status = $8, notes = $9, updated_at = $10 \
         WHERE id = $1 RETURNING *",
    )
    .bind(worker.id)
    .bind(&worker.name)
    .bind(&worker.badge_number)
    .bind(&worker.email)
    .bind(&worker.phone)
    .bind(&worker.department)
    .bind(&worker.position)
    .bind(worker.status)
    .bind(&worker.notes)
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(db_error("Failed to update worker"))
}

/// Soft-delete a worker.
pub async fn soft_delete<'e, E>(executor: E, id: WorkerId, now: DateTime<Utc>) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query("UPDATE workers SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .bind(now)
        .execute(executor)
        .await
        .map_err(db_error("Failed to delete worker"))?;
    Ok(())
}
