//! Application builder: wires router, middleware and state into an Axum app.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use toolcrib_core::config::AppConfig;
use toolcrib_core::error::AppError;
use toolcrib_core::result::AppResult;
use toolcrib_core::traits::SystemClock;
use toolcrib_database::{DatabasePool, PgInventoryStore};
use toolcrib_storage::{LocalBlobStore, SvgQrRenderer};

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::api_routes;
use crate::state::AppState;

/// Connects PostgreSQL and the local blob store and wires the production
/// state around them.
pub async fn connect_state(config: AppConfig) -> AppResult<AppState> {
    let db = DatabasePool::connect(&config.database).await?;
    let store = Arc::new(PgInventoryStore::new(&db));
    let blobs = Arc::new(LocalBlobStore::new(config.storage.root.clone()).await?);

    Ok(AppState::new(
        config,
        store,
        blobs,
        Arc::new(SvgQrRenderer),
        Arc::new(SystemClock),
    ))
}

/// Builds the complete Axum application with all routes and middleware.
///
/// When the storage public URL is a local path (e.g. `/storage`), the blob
/// root is served there so `qr_code_url` values resolve.
pub fn build_app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new().nest("/api", api_routes());

    let public = config.storage.public_base_url.trim_end_matches('/');
    if public.starts_with('/') {
        router = router.nest_service(public, ServeDir::new(&config.storage.root));
    }

    router
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.server.cors))
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl+C.
pub async fn run_server(state: AppState) -> AppResult<()> {
    let addr = state.config.server.bind_address();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("ToolCrib server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("ToolCrib server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
