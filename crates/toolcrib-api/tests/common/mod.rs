//! Shared helpers for API tests: an app over the in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

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
use toolcrib_database::MemoryInventoryStore;
use toolcrib_storage::{LocalBlobStore, SvgQrRenderer};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Clock shared with the app
    pub clock: Arc<ManualClock>,
    /// Backing store, for direct inspection
    pub store: Arc<MemoryInventoryStore>,
    _storage_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Content type header, if any
    pub content_type: Option<String>,
    /// Raw body
    pub bytes: Vec<u8>,
    /// Body parsed as JSON (`Null` when not JSON)
    pub body: Value,
}

/// Fixed start time of every test app.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap()
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create storage dir");
        let mut config = AppConfig::default();
        config.storage.root = dir.path().to_string_lossy().into_owned();

        let store = Arc::new(MemoryInventoryStore::new());
        let blobs = Arc::new(
            LocalBlobStore::new(dir.path())
                .await
                .expect("Failed to init blob store"),
        );
        let clock = Arc::new(ManualClock::new(start()));

        let state = AppState::new(
            config,
            store.clone(),
            blobs,
            Arc::new(SvgQrRenderer),
            clock.clone(),
        );

        Self {
            router: build_app(state),
            clock,
            store,
            _storage_dir: dir,
        }
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
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            content_type,
            bytes,
            body,
        }
    }

    /// Create a tool through the API and return its id.
    pub async fn create_tool(&self, code: &str) -> i64 {
        let response = self
            .request(
                "POST",
                "/api/tools",
                Some(json!({ "name": format!("Tool {code}"), "code": code, "category": "power" })),
                Some("1"),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"].as_i64().expect("tool id")
    }

    /// Create a worker through the API and return their id.
    pub async fn create_worker(&self, name: &str, badge: &str) -> i64 {
        let response = self
            .request(
                "POST",
                "/api/workers",
                Some(json!({ "name": name, "badge_number": badge, "department": "Assembly" })),
                Some("1"),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"].as_i64().expect("worker id")
    }
}
