//! Scanner endpoint tests over the in-memory store.

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_checkout_scan_and_return_flow() {
    let app = TestApp::new().await;
    let tool_id = app.create_tool("DRILL-001").await;
    let worker_id = app.create_worker("Jordan Lee", "B-007").await;

    let response = app
        .request(
            "POST",
            "/api/scanner/checkout",
            Some(json!({
                "tool_id": tool_id,
                "worker_id": worker_id,
                "condition_out": "good",
                "checkout_notes": "for line 3"
            })),
            Some("42"),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Tool checked out successfully");
    assert_eq!(response.body["data"]["tool"]["code"], "DRILL-001");
    assert_eq!(response.body["data"]["worker"]["badge_number"], "B-007");
    let checkout_id = response.body["data"]["checkout_id"].as_i64().unwrap();

    let scan = app
        .request(
            "POST",
            "/api/scanner/scan",
            Some(json!({ "qr_data": r#"{"type":"tool","id":1,"code":"DRILL-001"}"# })),
            None,
        )
        .await;
    assert_eq!(scan.status, StatusCode::OK);
    assert_eq!(scan.body["data"]["tool"]["is_checked_out"], true);
    assert_eq!(scan.body["data"]["tool"]["status"], "checked_out");
    assert_eq!(
        scan.body["data"]["current_checkout"]["worker"]["badge_number"],
        "B-007"
    );

    let detail = app
        .request("GET", &format!("/api/checkouts/{checkout_id}"), None, None)
        .await;
    assert_eq!(detail.body["data"]["checked_out_by"], 42);

    app.clock.advance(Duration::hours(3));
    let returned = app
        .request(
            "POST",
            "/api/scanner/return",
            Some(json!({ "checkout_id": checkout_id, "condition_in": "fair" })),
            Some("42"),
        )
        .await;
    assert_eq!(returned.status, StatusCode::OK, "{:?}", returned.body);
    assert_eq!(returned.body["data"]["tool"]["status"], "maintenance");
    assert!(returned.body["data"]["returned_at"].is_string());

    let again = app
        .request(
            "POST",
            "/api/scanner/return",
            Some(json!({ "checkout_id": checkout_id })),
            None,
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["error"], "INVALID_STATE");
    assert_eq!(again.body["message"], "already returned");
}

#[tokio::test]
async fn test_scan_rejects_foreign_payload() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/scanner/scan",
            Some(json!({ "qr_data": r#"{"type":"widget","code":"X"}"# })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], "INVALID_INPUT");
    assert_eq!(response.body["message"], "invalid QR code type");
}

#[tokio::test]
async fn test_scan_requires_qr_data() {
    let app = TestApp::new().await;
    let response = app
        .request("POST", "/api/scanner/scan", Some(json!({ "qr_data": "" })), None)
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["errors"]["qr_data"][0], "qr_data is required");
}

#[tokio::test]
async fn test_scan_unknown_tool_is_not_found() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/scanner/scan",
            Some(json!({ "qr_data": r#"{"type":"tool","code":"NOPE"}"# })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_second_checkout_of_same_tool_conflicts() {
    let app = TestApp::new().await;
    let tool_id = app.create_tool("SAW-002").await;
    let first = app.create_worker("Avery", "B-1").await;
    let second = app.create_worker("Blake", "B-2").await;

    let ok = app
        .request(
            "POST",
            "/api/scanner/checkout",
            Some(json!({ "tool_id": tool_id, "worker_id": first })),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);

    let rejected = app
        .request(
            "POST",
            "/api/scanner/checkout",
            Some(json!({ "tool_id": tool_id, "worker_id": second })),
            None,
        )
        .await;
    assert_eq!(rejected.status, StatusCode::CONFLICT);
    assert_eq!(rejected.body["message"], "tool not available");
}

#[tokio::test]
async fn test_checkout_input_validation() {
    let app = TestApp::new().await;
    let tool_id = app.create_tool("DRILL-001").await;
    let worker_id = app.create_worker("Jordan Lee", "B-007").await;

    let long_notes = app
        .request(
            "POST",
            "/api/scanner/checkout",
            Some(json!({
                "tool_id": tool_id,
                "worker_id": worker_id,
                "checkout_notes": "x".repeat(1001)
            })),
            None,
        )
        .await;
    assert_eq!(long_notes.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(long_notes.body["errors"]["checkout_notes"].is_array());

    let bad_condition = app
        .request(
            "POST",
            "/api/scanner/checkout",
            Some(json!({ "tool_id": tool_id, "worker_id": worker_id, "condition_out": "broken" })),
            None,
        )
        .await;
    assert_eq!(bad_condition.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(bad_condition.body["error"], "VALIDATION_FAILED");

    let bad_actor = app
        .request(
            "POST",
            "/api/scanner/checkout",
            Some(json!({ "tool_id": tool_id, "worker_id": worker_id })),
            Some("admin"),
        )
        .await;
    assert_eq!(bad_actor.status, StatusCode::BAD_REQUEST);

    let unknown_worker = app
        .request(
            "POST",
            "/api/scanner/checkout",
            Some(json!({ "tool_id": tool_id, "worker_id": 9999 })),
            None,
        )
        .await;
    assert_eq!(unknown_worker.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_worker_picker_lists_active_workers_by_name() {
    let app = TestApp::new().await;
    app.create_worker("Casey", "B-3").await;
    app.create_worker("Avery", "B-1").await;
    let suspended = app.create_worker("Aaron", "B-4").await;
    app.request(
        "PUT",
        &format!("/api/workers/{suspended}"),
        Some(json!({ "status": "suspended" })),
        None,
    )
    .await;

    let response = app.request("GET", "/api/scanner/workers", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Avery", "Casey"]);

    let filtered = app
        .request("GET", "/api/scanner/workers?search=b-3", None, None)
        .await;
    assert_eq!(filtered.body["data"].as_array().unwrap().len(), 1);
}
