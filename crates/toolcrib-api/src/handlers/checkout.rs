//! Checkout administration handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use toolcrib_core::types::{CheckoutId, PageResponse};
use toolcrib_entity::checkout::{Checkout, CheckoutDetails, CheckoutFilter};

use crate::dto::request::{CheckoutRequest, ReturnRequest, UpdateCheckoutRequest};
use crate::dto::response::{ApiResponse, RefreshResponse};
use crate::error::ApiResult;
use crate::extractors::{Actor, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/checkouts?state=active|returned|overdue&tool_id=&worker_id=
pub async fn list_checkouts(
    State(state): State<AppState>,
    actor: Actor,
    Query(filter): Query<CheckoutFilter>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<CheckoutDetails>>>> {
    let page = state
        .checkout_service
        .list_checkouts(&actor, &filter, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/checkouts
pub async fn create_checkout(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(req): ValidatedJson<CheckoutRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CheckoutDetails>>)> {
    let details = state.checkout_service.checkout_tool(&actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(details))))
}

/// GET /api/checkouts/{id}
pub async fn get_checkout(
    State(state): State<AppState>,
    Path(id): Path<CheckoutId>,
) -> ApiResult<Json<ApiResponse<CheckoutDetails>>> {
    let details = state.checkout_service.get_checkout(id).await?;
    Ok(Json(ApiResponse::ok(details)))
}

/// PUT /api/checkouts/{id}
pub async fn update_checkout(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<CheckoutId>,
    ValidatedJson(req): ValidatedJson<UpdateCheckoutRequest>,
) -> ApiResult<Json<ApiResponse<Checkout>>> {
    let checkout = state
        .checkout_service
        .update_checkout(&actor, id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(checkout)))
}

/// POST /api/checkouts/{id}/return
pub async fn return_checkout(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<CheckoutId>,
    ValidatedJson(req): ValidatedJson<ReturnRequest>,
) -> ApiResult<Json<ApiResponse<CheckoutDetails>>> {
    let details = state
        .checkout_service
        .return_tool(&actor, req.into_data(id))
        .await?;
    Ok(Json(ApiResponse::ok(details)))
}

/// POST /api/checkouts/overdue/refresh
pub async fn refresh_overdue(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<ApiResponse<RefreshResponse>>> {
    let updated = state.checkout_service.refresh_overdue(&actor).await?;
    Ok(Json(ApiResponse::ok(RefreshResponse { updated })))
}
