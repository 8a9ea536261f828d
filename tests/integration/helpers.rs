//! Shared test helpers for the PostgreSQL-backed integration tests.
//!
//! Set `TOOLCRIB_TEST_DATABASE_URL` to run them; without it every test
//! returns early. Tests share the database, so each one works on its own
//! uniquely-coded tools and badges instead of truncating tables.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use toolcrib_api::{AppState, build_app};
use toolcrib_core::config::AppConfig;
use toolcrib_core::traits::ManualClock;
use toolcrib_database::{DatabasePool, PgInventoryStore};
use toolcrib_storage::{LocalBlobStore, SvgQrRenderer};

const DATABASE_URL_VAR: &str = "TOOLCRIB_TEST_DATABASE_URL";

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Clock shared with the app
    pub clock: Arc<ManualClock>,
    /// Connection pool, closed on drop of the runtime
    pub db: DatabasePool,
    _storage_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Body parsed as JSON (`Null` when not JSON)
    pub body: Value,
}

/// Fixed start time of every test app.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap()
}

/// A code fragment no other test in this run will produce.
pub fn unique(prefix: &str) -> String {
    let nanos = Utc::now().timestamp_subsec_nanos();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos:x}{seq}")
}

impl TestApp {
    /// Connect to the test database, or `None` when it is not configured.
    pub async fn connect() -> Option<Self> {
        let Ok(url) = std::env::var(DATABASE_URL_VAR) else {
            eprintln!("{DATABASE_URL_VAR} not set; skipping");
            return None;
        };

        let dir = tempfile::tempdir().expect("Failed to create storage dir");
        let mut config = AppConfig::default();
        config.database.url = url;
        config.database.max_connections = 5;
        config.database.min_connections = 1;
        config.storage.root = dir.path().to_string_lossy().into_owned();

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        let store = Arc::new(PgInventoryStore::new(&db));
        let blobs = Arc::new(
            LocalBlobStore::new(dir.path())
                .await
                .expect("Failed to init blob store"),
        );
        let clock = Arc::new(ManualClock::new(start()));

        let state = AppState::new(config, store, blobs, Arc::new(SvgQrRenderer), clock.clone());

        Some(Self {
            router: build_app(state),
            clock,
            db,
            _storage_dir: dir,
        })
    }

    /// Send a request, optionally with a JSON body and an actor header.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        actor: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(actor) = actor {
            req = req.header("x-actor-id", actor);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create a tool and return its id.
    pub async fn create_tool(&self, code: &str) -> i64 {
        let response = self
            .request(
                "POST",
                "/api/tools",
                Some(json!({ "name": format!("Tool {code}"), "code": code })),
                Some("1"),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"].as_i64().expect("tool id")
    }

    /// Create a worker and return their id.
    pub async fn create_worker(&self, name: &str, badge: &str) -> i64 {
        let response = self
            .request(
                "POST",
                "/api/workers",
                Some(json!({ "name": name, "badge_number": badge })),
                Some("1"),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"].as_i64().expect("worker id")
    }
}
