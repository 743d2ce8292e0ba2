mod common;

use std::sync::Arc;

use axum::http::Method;
use chrono::Datelike;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr};
use serde_json::json;
use uuid::Uuid;

use common::{read_json, TestApp};
use labelpress_api::entities::order::OrderStatus;
use labelpress_api::services::OrderService;

#[tokio::test]
async fn new_orders_start_received_with_a_generated_number() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Etykiety Nowak").await;

    let order = app.seed_order(client_id, "2024-06-17").await;
    let data = &order["data"];

    assert_eq!(data["status"], "received");
    assert_eq!(data["version"], 1);
    let number = data["order_number"].as_str().expect("order number");
    let re = regex::Regex::new(r"^ZAM-\d{4}-\d{3}$").unwrap();
    assert!(re.is_match(number), "unexpected order number {number}");
}

#[tokio::test]
async fn explicit_order_numbers_must_match_the_pattern() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Etykiety Nowak").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_id": client_id,
                "order_number": "ORDER-1",
                "delivery_date": "2024-06-17",
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn same_status_update_writes_nothing() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Etykiety Nowak").await;
    let order = app.seed_order(client_id, "2024-06-17").await;
    let id = order["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/status"),
            Some(json!({ "status": "received" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    // The version counter only moves on an actual write.
    assert_eq!(body["data"]["version"], 1);
    assert_eq!(body["data"]["status"], "received");
}

#[tokio::test]
async fn status_moves_freely_between_production_stages() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Etykiety Nowak").await;
    let order = app.seed_order(client_id, "2024-06-17").await;
    let id = order["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/orders/{id}/status");

    for (target, expected_version) in [
        ("in_production", 2),
        ("ready", 3),
        ("in_production", 4),
        ("received", 5),
    ] {
        let response = app
            .request(Method::PUT, &uri, Some(json!({ "status": target })))
            .await;
        assert_eq!(response.status(), 200, "moving to {target}");
        let body = read_json(response).await;
        assert_eq!(body["data"]["status"], target);
        assert_eq!(body["data"]["version"], expected_version);
    }
}

#[tokio::test]
async fn fulfilled_is_terminal_and_fulfilment_is_idempotent() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Etykiety Nowak").await;
    let order = app.seed_order(client_id, "2024-06-17").await;
    let id = order["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(Method::POST, &format!("/api/v1/orders/{id}/fulfill"), None)
        .await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "fulfilled");
    assert_eq!(body["data"]["version"], 2);

    // Repeating the call changes nothing.
    let response = app
        .request(Method::POST, &format!("/api/v1/orders/{id}/fulfill"), None)
        .await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["data"]["version"], 2);

    // No stage change can leave the terminal state.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/status"),
            Some(json!({ "status": "ready" })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // The order record itself stays fully readable.
    let response = app
        .request(Method::GET, &format!("/api/v1/orders/{id}"), None)
        .await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "fulfilled");
}

#[tokio::test]
async fn status_endpoint_refuses_fulfilled_as_a_target() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Etykiety Nowak").await;
    let order = app.seed_order(client_id, "2024-06-17").await;
    let id = order["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/status"),
            Some(json!({ "status": "fulfilled" })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn unknown_order_returns_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/orders/{}", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn orders_require_a_known_client() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_id": Uuid::new_v4(),
                "delivery_date": "2024-06-17",
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn order_items_are_stored_with_the_order() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Etykiety Nowak").await;
    let order = app.seed_order(client_id, "2024-06-17").await;
    let id = order["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(Method::GET, &format!("/api/v1/orders/{id}/items"), None)
        .await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    let items = body["data"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["material"], "PP white gloss");
    assert_eq!(items[0]["quantity_unit"], "pcs");
}

#[tokio::test]
async fn failed_write_leaves_the_stored_status_untouched() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Etykiety Nowak").await;
    let order = app.seed_order(client_id, "2024-06-17").await;
    let id = Uuid::parse_str(order["data"]["id"].as_str().unwrap()).unwrap();

    // A service whose connection errors on the first query fails before any
    // write happens.
    let failing = MockDatabase::new(DatabaseBackend::Sqlite)
        .append_query_errors(vec![DbErr::Conn(RuntimeErr::Internal(
            "connection lost".to_string(),
        ))])
        .into_connection();
    let broken = OrderService::new(Arc::new(failing), None);
    assert!(broken.update_status(id, OrderStatus::Ready).await.is_err());

    let response = app
        .request(Method::GET, &format!("/api/v1/orders/{id}"), None)
        .await;
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "received");
    assert_eq!(body["data"]["version"], 1);
}

#[tokio::test]
async fn auto_numbering_continues_past_explicit_numbers() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Etykiety Nowak").await;
    let year = chrono::Utc::now().year();

    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_id": client_id,
                "order_number": format!("ZAM-{year}-002"),
                "delivery_date": "2024-06-17",
            })),
        )
        .await;
    assert_eq!(response.status(), 201);

    // Generated numbers pick up after the highest stored one, not after the
    // row count.
    let first = app.seed_order(client_id, "2024-06-18").await;
    assert_eq!(
        first["data"]["order_number"].as_str().unwrap(),
        format!("ZAM-{year}-003")
    );
    let second = app.seed_order(client_id, "2024-06-19").await;
    assert_eq!(
        second["data"]["order_number"].as_str().unwrap(),
        format!("ZAM-{year}-004")
    );
}

#[tokio::test]
async fn duplicate_order_numbers_are_rejected_as_a_conflict() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Etykiety Nowak").await;
    let body = json!({
        "client_id": client_id,
        "order_number": "ZAM-2024-010",
        "delivery_date": "2024-06-17",
    });

    let response = app
        .request(Method::POST, "/api/v1/orders", Some(body.clone()))
        .await;
    assert_eq!(response.status(), 201);

    let response = app.request(Method::POST, "/api/v1/orders", Some(body)).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn yearly_sequence_increments_per_order() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Etykiety Nowak").await;

    let first = app.seed_order(client_id, "2024-06-17").await;
    let second = app.seed_order(client_id, "2024-06-18").await;

    let first_number = first["data"]["order_number"].as_str().unwrap();
    let second_number = second["data"]["order_number"].as_str().unwrap();
    assert_ne!(first_number, second_number);
}
