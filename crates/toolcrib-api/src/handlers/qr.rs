//! QR label handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};

use toolcrib_core::error::AppError;
use toolcrib_core::types::ToolId;
use toolcrib_service::QrLabel;

use crate::dto::request::QrBatchRequest;
use crate::dto::response::{ApiResponse, DeletedResponse};
use crate::error::ApiResult;
use crate::extractors::{Actor, ValidatedJson};
use crate::state::AppState;

/// GET /api/tools/{id}/qr
pub async fn download_qr(
    State(state): State<AppState>,
    Path(id): Path<ToolId>,
) -> ApiResult<Response> {
    let (content_type, data) = state.qr_service.read_label(id).await?;
    let content_type = HeaderValue::from_str(&content_type)
        .map_err(|_| AppError::internal(format!("Invalid content type '{content_type}'")))?;
    Ok(([(header::CONTENT_TYPE, content_type)], data).into_response())
}

/// POST /api/tools/{id}/qr
pub async fn generate_qr(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ToolId>,
) -> ApiResult<Json<ApiResponse<QrLabel>>> {
    let label = state.qr_service.generate_for_tool(&actor, id).await?;
    Ok(Json(ApiResponse::ok(label)))
}

/// PUT /api/tools/{id}/qr
pub async fn regenerate_qr(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ToolId>,
) -> ApiResult<Json<ApiResponse<QrLabel>>> {
    let label = state.qr_service.regenerate_for_tool(&actor, id).await?;
    Ok(Json(ApiResponse::ok(label)))
}

/// DELETE /api/tools/{id}/qr
pub async fn delete_qr(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ToolId>,
) -> ApiResult<Json<ApiResponse<DeletedResponse>>> {
    let deleted = state.qr_service.delete_for_tool(&actor, id).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse { deleted })))
}

/// POST /api/tools/qr/batch
pub async fn generate_batch(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(req): ValidatedJson<QrBatchRequest>,
) -> ApiResult<Json<ApiResponse<Vec<QrLabel>>>> {
    let labels = state.qr_service.generate_batch(&actor, &req.tool_ids).await?;
    Ok(Json(ApiResponse::ok(labels)))
}
