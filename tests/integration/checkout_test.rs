//! Checkout lifecycle against PostgreSQL.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use helpers::{TestApp, unique};

#[tokio::test]
async fn test_checkout_scan_and_return_with_fair_condition() {
    let Some(app) = TestApp::connect().await else {
        return;
    };
    let code = unique("DRILL");
    let tool_id = app.create_tool(&code).await;
    let worker_id = app.create_worker("Jordan Lee", &unique("B")).await;

    let checkout = app
        .request(
            "POST",
            "/api/scanner/checkout",
            Some(json!({ "tool_id": tool_id, "worker_id": worker_id, "condition_out": "good" })),
            Some("7"),
        )
        .await;
    assert_eq!(checkout.status, StatusCode::OK, "{:?}", checkout.body);
    let checkout_id = checkout.body["data"]["checkout_id"].as_i64().unwrap();

    let qr = format!(r#"{{"type":"tool","code":"{code}"}}"#);
    let scan = app
        .request("POST", "/api/scanner/scan", Some(json!({ "qr_data": qr })), None)
        .await;
    assert_eq!(scan.status, StatusCode::OK);
    assert_eq!(scan.body["data"]["tool"]["status"], "checked_out");
    assert_eq!(scan.body["data"]["current_checkout"]["id"], checkout_id);

    app.clock.advance(Duration::hours(2));
    let returned = app
        .request(
            "POST",
            "/api/scanner/return",
            Some(json!({ "checkout_id": checkout_id, "condition_in": "fair" })),
            Some("7"),
        )
        .await;
    assert_eq!(returned.status, StatusCode::OK, "{:?}", returned.body);
    assert_eq!(returned.body["data"]["tool"]["status"], "maintenance");

    let detail = app
        .request("GET", &format!("/api/checkouts/{checkout_id}"), None, None)
        .await;
    assert_eq!(detail.body["data"]["condition_in"], "fair");
    assert_eq!(detail.body["data"]["returned_by"], 7);
}

#[tokio::test]
async fn test_one_open_checkout_per_tool() {
    let Some(app) = TestApp::connect().await else {
        return;
    };
    let tool_id = app.create_tool(&unique("SAW")).await;
    let first = app.create_worker("Avery", &unique("B")).await;
    let second = app.create_worker("Blake", &unique("B")).await;

    let ok = app
        .request(
            "POST",
            "/api/checkouts",
            Some(json!({ "tool_id": tool_id, "worker_id": first })),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::CREATED, "{:?}", ok.body);

    let conflict = app
        .request(
            "POST",
            "/api/checkouts",
            Some(json!({ "tool_id": tool_id, "worker_id": second })),
            None,
        )
        .await;
    assert_eq!(conflict.status, StatusCode::CONFLICT);
    assert_eq!(conflict.body["message"], "tool not available");
}

#[tokio::test]
async fn test_overdue_flag_follows_due_time() {
    let Some(app) = TestApp::connect().await else {
        return;
    };
    let tool_id = app.create_tool(&unique("TORQUE")).await;
    let worker_id = app.create_worker("Casey", &unique("B")).await;

    let due = helpers::start() + Duration::hours(4);
    let created = app
        .request(
            "POST",
            "/api/checkouts",
            Some(json!({
                "tool_id": tool_id,
                "worker_id": worker_id,
                "expected_return_at": due.to_rfc3339()
            })),
            None,
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    let checkout_id = created.body["data"]["id"].as_i64().unwrap();

    app.clock.advance(Duration::hours(5));
    let refresh = app
        .request("POST", "/api/checkouts/overdue/refresh", None, None)
        .await;
    assert_eq!(refresh.status, StatusCode::OK);
    assert!(refresh.body["data"]["updated"].as_u64().unwrap() >= 1);

    let detail = app
        .request("GET", &format!("/api/checkouts/{checkout_id}"), None, None)
        .await;
    assert_eq!(detail.body["data"]["is_overdue"], true);

    let listed = app
        .request(
            "GET",
            &format!("/api/checkouts?state=overdue&tool_id={tool_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"]["items"][0]["id"], checkout_id);
}

#[tokio::test]
async fn test_widget_payload_is_rejected() {
    let Some(app) = TestApp::connect().await else {
        return;
    };
    let response = app
        .request(
            "POST",
            "/api/scanner/scan",
            Some(json!({ "qr_data": r#"{"type":"widget","code":"X"}"# })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_INPUT");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_checkouts_of_one_tool() {
    let Some(app) = TestApp::connect().await else {
        return;
    };
    let tool_id = app.create_tool(&unique("GRINDER")).await;
    let first = app.create_worker("Dana", &unique("B")).await;
    let second = app.create_worker("Eli", &unique("B")).await;

    let (a, b) = tokio::join!(
        app.request(
            "POST",
            "/api/checkouts",
            Some(json!({ "tool_id": tool_id, "worker_id": first })),
            None,
        ),
        app.request(
            "POST",
            "/api/checkouts",
            Some(json!({ "tool_id": tool_id, "worker_id": second })),
            None,
        ),
    );

    let mut statuses = [a.status, b.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT], "{:?} {:?}", a.body, b.body);

    let open = app
        .request(
            "GET",
            &format!("/api/checkouts?state=active&tool_id={tool_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(open.body["data"]["total_items"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_returns_of_one_checkout() {
    let Some(app) = TestApp::connect().await else {
        return;
    };
    let tool_id = app.create_tool(&unique("HAMMER")).await;
    let worker_id = app.create_worker("Frankie", &unique("B")).await;
    let created = app
        .request(
            "POST",
            "/api/checkouts",
            Some(json!({ "tool_id": tool_id, "worker_id": worker_id })),
            None,
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    let checkout_id = created.body["data"]["id"].as_i64().unwrap();

    let (a, b) = tokio::join!(
        app.request(
            "POST",
            "/api/scanner/return",
            Some(json!({ "checkout_id": checkout_id, "condition_in": "good" })),
            None,
        ),
        app.request(
            "POST",
            "/api/scanner/return",
            Some(json!({ "checkout_id": checkout_id, "condition_in": "poor" })),
            None,
        ),
    );

    let (ok, rejected) = if a.status == StatusCode::OK { (a, b) } else { (b, a) };
    assert_eq!(ok.status, StatusCode::OK, "{:?}", ok.body);
    assert_eq!(rejected.status, StatusCode::CONFLICT, "{:?}", rejected.body);
    assert_eq!(rejected.body["message"], "already returned");

    let winner = match ok.body["data"]["tool"]["status"].as_str() {
        Some("available") => "good",
        _ => "poor",
    };
    let detail = app
        .request("GET", &format!("/api/checkouts/{checkout_id}"), None, None)
        .await;
    assert_eq!(detail.body["data"]["condition_in"], winner);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_delete_racing_a_checkout() {
    let Some(app) = TestApp::connect().await else {
        return;
    };
    let tool_id = app.create_tool(&unique("LEVEL")).await;
    let worker_id = app.create_worker("Gale", &unique("B")).await;

    let delete_path = format!("/api/workers/{worker_id}");
    let (checkout, delete) = tokio::join!(
        app.request(
            "POST",
            "/api/checkouts",
            Some(json!({ "tool_id": tool_id, "worker_id": worker_id })),
            None,
        ),
        app.request("DELETE", &delete_path, None, None),
    );

    match (checkout.status, delete.status) {
        (StatusCode::CREATED, StatusCode::CONFLICT) => {
            assert_eq!(delete.body["message"], "worker holds 1 open checkout(s)");
        }
        (StatusCode::NOT_FOUND, StatusCode::NO_CONTENT) => {}
        other => panic!("both or neither won: {other:?} {:?} {:?}", checkout.body, delete.body),
    }
}
