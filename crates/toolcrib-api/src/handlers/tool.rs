//! Tool CRUD handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use toolcrib_core::types::{PageResponse, ToolId};
use toolcrib_entity::tool::ToolFilter;

use crate::dto::request::{CreateToolRequest, UpdateToolRequest};
use crate::dto::response::{ApiResponse, ToolResponse};
use crate::error::ApiResult;
use crate::extractors::{Actor, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/tools?status=&category=&search=&page=&per_page=
pub async fn list_tools(
    State(state): State<AppState>,
    Query(filter): Query<ToolFilter>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<ToolResponse>>>> {
    let page = state
        .tool_service
        .list_tools(&filter, params.into_page_request())
        .await?;
    let storage = &state.config.storage;
    Ok(Json(ApiResponse::ok(page.map(|t| ToolResponse::new(t, storage)))))
}

/// GET /api/tools/{id}
pub async fn get_tool(
    State(state): State<AppState>,
    Path(id): Path<ToolId>,
) -> ApiResult<Json<ApiResponse<ToolResponse>>> {
    let tool = state.tool_service.get_tool(id).await?;
    Ok(Json(ApiResponse::ok(ToolResponse::new(tool, &state.config.storage))))
}

/// POST /api/tools
pub async fn create_tool(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(req): ValidatedJson<CreateToolRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ToolResponse>>)> {
    let tool = state.tool_service.create_tool(&actor, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ToolResponse::new(tool, &state.config.storage))),
    ))
}

/// PUT /api/tools/{id}
pub async fn update_tool(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ToolId>,
    ValidatedJson(req): ValidatedJson<UpdateToolRequest>,
) -> ApiResult<Json<ApiResponse<ToolResponse>>> {
    let tool = state.tool_service.update_tool(&actor, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(ToolResponse::new(tool, &state.config.storage))))
}

/// DELETE /api/tools/{id}
pub async fn delete_tool(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ToolId>,
) -> ApiResult<StatusCode> {
    state.tool_service.delete_tool(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
