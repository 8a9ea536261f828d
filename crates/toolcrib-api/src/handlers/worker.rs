//! Worker CRUD handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use toolcrib_core::types::{PageResponse, WorkerId};
use toolcrib_entity::worker::{Worker, WorkerFilter};
use toolcrib_service::WorkerDetails;

use crate::dto::request::{CreateWorkerRequest, UpdateWorkerRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{Actor, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/workers?status=&department=&search=&page=&per_page=
pub async fn list_workers(
    State(state): State<AppState>,
    Query(filter): Query<WorkerFilter>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Worker>>>> {
    let page = state
        .worker_service
        .list_workers(&filter, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/workers/{id}
pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<WorkerId>,
) -> ApiResult<Json<ApiResponse<WorkerDetails>>> {
    let worker = state.worker_service.get_worker(id).await?;
    Ok(Json(ApiResponse::ok(worker)))
}

/// POST /api/workers
pub async fn create_worker(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(req): ValidatedJson<CreateWorkerRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Worker>>)> {
    let worker = state.worker_service.create_worker(&actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(worker))))
}

/// PUT /api/workers/{id}
pub async fn update_worker(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<WorkerId>,
    ValidatedJson(req): ValidatedJson<UpdateWorkerRequest>,
) -> ApiResult<Json<ApiResponse<Worker>>> {
    let worker = state.worker_service.update_worker(&actor, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(worker)))
}

/// DELETE /api/workers/{id}
pub async fn delete_worker(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<WorkerId>,
) -> ApiResult<StatusCode> {
    state.worker_service.delete_worker(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
