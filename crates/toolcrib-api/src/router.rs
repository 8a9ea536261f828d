//! Route definitions for the ToolCrib HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` router. State is attached by [`crate::app::build_app`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .merge(scanner_routes())
        .merge(tool_routes())
        .merge(qr_routes())
        .merge(worker_routes())
        .merge(checkout_routes())
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Scanner client: scan, worker picker, checkout, return
fn scanner_routes() -> Router<AppState> {
    Router::new()
        .route("/scanner/scan", post(handlers::scanner::scan))
        .route("/scanner/workers", get(handlers::scanner::workers))
        .route("/scanner/checkout", post(handlers::scanner::checkout))
        .route("/scanner/return", post(handlers::scanner::return_tool))
}

fn tool_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tools",
            get(handlers::tool::list_tools).post(handlers::tool::create_tool),
        )
        .route(
            "/tools/{id}",
            get(handlers::tool::get_tool)
                .put(handlers::tool::update_tool)
                .delete(handlers::tool::delete_tool),
        )
}

fn qr_routes() -> Router<AppState> {
    Router::new()
        .route("/tools/qr/batch", post(handlers::qr::generate_batch))
        .route(
            "/tools/{id}/qr",
            get(handlers::qr::download_qr)
                .post(handlers::qr::generate_qr)
                .put(handlers::qr::regenerate_qr)
                .delete(handlers::qr::delete_qr),
        )
}

fn worker_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workers",
            get(handlers::worker::list_workers).post(handlers::worker::create_worker),
        )
        .route(
            "/workers/{id}",
            get(handlers::worker::get_worker)
                .put(handlers::worker::update_worker)
                .delete(handlers::worker::delete_worker),
        )
}

fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/checkouts",
            get(handlers::checkout::list_checkouts).post(handlers::checkout::create_checkout),
        )
        .route(
            "/checkouts/overdue/refresh",
            post(handlers::checkout::refresh_overdue),
        )
        .route(
            "/checkouts/{id}",
            get(handlers::checkout::get_checkout).put(handlers::checkout::update_checkout),
        )
        .route(
            "/checkouts/{id}/return",
            post(handlers::checkout::return_checkout),
        )
}
