//! # toolcrib-api
//!
//! HTTP API layer for ToolCrib built on Axum.
//!
//! Provides the scanner endpoints used by the handheld web client, the
//! admin endpoints for tools, workers, checkouts and QR labels, request
//! DTOs with validation, the actor extractor, middleware, and the mapping
//! from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, connect_state, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
