//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use toolcrib_core::config::AppConfig;
use toolcrib_core::traits::{BlobStore, Clock, QrRenderer};
use toolcrib_database::InventoryStore;
use toolcrib_service::{
    CheckoutService, QrService, QrSettings, RequestContext, ScannerService, ToolService,
    WorkerService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Source of request timestamps
    pub clock: Arc<dyn Clock>,
    /// Inventory store (PostgreSQL or in-memory)
    pub store: Arc<dyn InventoryStore>,
    /// Blob store holding QR images
    pub blobs: Arc<dyn BlobStore>,

    // ── Services ─────────────────────────────────────────────
    /// Checkout and return
    pub checkout_service: Arc<CheckoutService>,
    /// Scan lookup and worker picker
    pub scanner_service: Arc<ScannerService>,
    /// Tool administration
    pub tool_service: Arc<ToolService>,
    /// Worker administration
    pub worker_service: Arc<WorkerService>,
    /// QR label generation
    pub qr_service: Arc<QrService>,
}

impl AppState {
    /// Wire every service over the given infrastructure.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn InventoryStore>,
        blobs: Arc<dyn BlobStore>,
        renderer: Arc<dyn QrRenderer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let checkout_service = Arc::new(CheckoutService::new(Arc::clone(&store)));
        let scanner_service = Arc::new(ScannerService::new(Arc::clone(&store), &config.scanner));
        let tool_service = Arc::new(ToolService::new(Arc::clone(&store)));
        let worker_service = Arc::new(WorkerService::new(Arc::clone(&store)));
        let qr_service = Arc::new(QrService::new(
            Arc::clone(&store),
            Arc::clone(&blobs),
            renderer,
            QrSettings::from(&config.storage),
        ));

        Self {
            config: Arc::new(config),
            clock,
            store,
            blobs,
            checkout_service,
            scanner_service,
            tool_service,
            worker_service,
            qr_service,
        }
    }

    /// A context with no actor, stamped with the current time.
    pub fn system_context(&self) -> RequestContext {
        RequestContext::system(self.clock.as_ref())
    }
}
