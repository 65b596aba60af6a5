use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use circulation::router::build_router;
use circulation::state::AppState;

/// Router-level tests exercise everything in front of the database: health
/// endpoints, the identity extractor, and request validation. A disconnected
/// handle is enough: every asserted circulation path rejects before touching
/// it, and the readiness probe reports the dead handle as not ready.
fn test_server() -> TestServer {
    let state = AppState {
        db: sea_orm::DatabaseConnection::default(),
    };
    TestServer::new(build_router(state)).unwrap()
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_200_on_healthz() {
    let server = test_server();
    let response = server.get("/healthz").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let server = test_server();
    let response = server.get("/readyz").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

// ── Identity ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_borrow_without_identity() {
    let server = test_server();
    let response = server.post("/borrows").json(&json!({ "book_id": 1 })).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_return_without_identity() {
    let server = test_server();
    let response = server
        .patch("/borrows")
        .json(&json!({ "record_id": 1 }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_borrow_with_non_numeric_identity() {
    let server = test_server();
    let response = server
        .post("/borrows")
        .add_header("x-user-id", "alice")
        .json(&json!({ "book_id": 1 }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ── Validation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_borrow_with_non_positive_book_id() {
    let server = test_server();
    let response = server
        .post("/borrows")
        .add_header("x-user-id", "7")
        .json(&json!({ "book_id": 0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "INVALID_REQUEST");
}

#[tokio::test]
async fn should_reject_return_with_non_positive_record_id() {
    let server = test_server();
    let response = server
        .patch("/borrows")
        .add_header("x-user-id", "7")
        .json(&json!({ "record_id": -1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "INVALID_REQUEST");
}
