//! Handlers backing the handheld scanner client.

use axum::Json;
use axum::extract::{Query, State};

use toolcrib_entity::worker::WorkerSummary;
use toolcrib_service::ScanResult;

use crate::dto::request::{CheckoutRequest, ScanRequest, ScannerReturnRequest, WorkerSearchQuery};
use crate::dto::response::{ApiResponse, ScannerCheckoutResponse, ScannerReturnResponse};
use crate::error::ApiResult;
use crate::extractors::{Actor, ValidatedJson};
use crate::state::AppState;

/// POST /api/scanner/scan
pub async fn scan(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(req): ValidatedJson<ScanRequest>,
) -> ApiResult<Json<ApiResponse<ScanResult>>> {
    let result = state.scanner_service.scan_lookup(&actor, &req.qr_data).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/scanner/workers?search=
pub async fn workers(
    State(state): State<AppState>,
    Query(query): Query<WorkerSearchQuery>,
) -> ApiResult<Json<ApiResponse<Vec<WorkerSummary>>>> {
    let workers = state
        .scanner_service
        .list_active_workers(query.search.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(workers)))
}

/// POST /api/scanner/checkout
pub async fn checkout(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(req): ValidatedJson<CheckoutRequest>,
) -> ApiResult<Json<ApiResponse<ScannerCheckoutResponse>>> {
    let details = state.checkout_service.checkout_tool(&actor, req.into()).await?;
    Ok(Json(ApiResponse::with_message(
        ScannerCheckoutResponse::from(&details),
        "Tool checked out successfully",
    )))
}

/// POST /api/scanner/return
pub async fn return_tool(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(req): ValidatedJson<ScannerReturnRequest>,
) -> ApiResult<Json<ApiResponse<ScannerReturnResponse>>> {
    let details = state.checkout_service.return_tool(&actor, req.into()).await?;
    Ok(Json(ApiResponse::with_message(
        ScannerReturnResponse::from(&details),
        "Tool returned successfully",
    )))
}
