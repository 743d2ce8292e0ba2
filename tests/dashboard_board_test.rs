mod common;

use axum::http::Method;
use chrono::{Datelike, NaiveDate};
use serde_json::json;

use common::{read_json, TestApp};

const BOARD_URI: &str = "/api/v1/dashboard?date=2024-06-13";

fn column<'a>(board: &'a serde_json::Value, date: &str) -> &'a serde_json::Value {
    board["data"]["days"]
        .as_array()
        .expect("days array")
        .iter()
        .find(|d| d["date"] == date)
        .unwrap_or_else(|| panic!("no column for {date}"))
}

#[tokio::test]
async fn board_spans_four_weeks_of_weekdays() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, BOARD_URI, None).await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;

    let days = body["data"]["days"].as_array().expect("days array");
    assert_eq!(days.len(), 20);
    assert_eq!(body["data"]["first_date"], "2024-06-03");
    assert_eq!(body["data"]["last_date"], "2024-06-28");

    for day in days {
        let date: NaiveDate = day["date"].as_str().unwrap().parse().unwrap();
        assert!(
            date.weekday().num_days_from_monday() < 5,
            "weekend date {date} on the board"
        );
        assert!(day["orders"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn orders_land_in_their_delivery_day_column() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Drukarnia Kolor").await;
    let order = app.seed_order(client_id, "2024-06-17").await;
    let order_id = order["data"]["id"].as_str().unwrap();

    let board = read_json(app.request(Method::GET, BOARD_URI, None).await).await;
    let monday = column(&board, "2024-06-17");
    let orders = monday["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);

    let card = &orders[0];
    assert_eq!(card["order_id"], order_id);
    assert_eq!(card["client_name"], "Drukarnia Kolor");
    assert_eq!(card["status"], "received");
    // Thursday the 13th to Monday the 17th crosses a weekend: two workdays.
    assert_eq!(card["workdays_left"], 2);
    assert_eq!(card["urgency"], "two_days");
    assert_eq!(card["accent_color"], "#b2d7ff");
}

#[tokio::test]
async fn overdue_orders_are_flagged() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Drukarnia Kolor").await;
    app.seed_order(client_id, "2024-06-12").await;

    let board = read_json(app.request(Method::GET, BOARD_URI, None).await).await;
    let card = &column(&board, "2024-06-12")["orders"][0];
    assert_eq!(card["workdays_left"], -1);
    assert_eq!(card["urgency"], "overdue");
    assert_eq!(card["accent_color"], "#ff6666");
}

#[tokio::test]
async fn deliver_today_is_due_today_until_pushed_to_tomorrow() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Drukarnia Kolor").await;
    let order = app.seed_order(client_id, "2024-06-13").await;
    let id = order["data"]["id"].as_str().unwrap().to_string();

    let board = read_json(app.request(Method::GET, BOARD_URI, None).await).await;
    let card = &column(&board, "2024-06-13")["orders"][0];
    assert_eq!(card["workdays_left"], 0);
    assert_eq!(card["urgency"], "due_today");
    assert_eq!(card["accent_color"], "#ffe600");

    // Pushing delivery to Friday buys exactly one workday.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/delivery-date"),
            Some(json!({ "delivery_date": "2024-06-14" })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let board = read_json(app.request(Method::GET, BOARD_URI, None).await).await;
    assert!(column(&board, "2024-06-13")["orders"]
        .as_array()
        .unwrap()
        .is_empty());
    let card = &column(&board, "2024-06-14")["orders"][0];
    assert_eq!(card["workdays_left"], 1);
    assert_eq!(card["urgency"], "one_day");
    assert_eq!(card["accent_color"], "#ffc966");
}

#[tokio::test]
async fn orders_sharing_a_delivery_date_share_a_column() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Drukarnia Kolor").await;
    app.seed_order(client_id, "2024-06-17").await;
    app.seed_order(client_id, "2024-06-17").await;

    let board = read_json(app.request(Method::GET, BOARD_URI, None).await).await;
    let orders = column(&board, "2024-06-17")["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
}

#[tokio::test]
async fn rescheduling_moves_the_order_between_columns() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Drukarnia Kolor").await;
    let order = app.seed_order(client_id, "2024-06-17").await;
    let id = order["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/delivery-date"),
            Some(json!({ "delivery_date": "2024-06-20" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["data"]["delivery_date"], "2024-06-20");
    assert_eq!(body["data"]["version"], 2);

    let board = read_json(app.request(Method::GET, BOARD_URI, None).await).await;
    assert!(column(&board, "2024-06-17")["orders"]
        .as_array()
        .unwrap()
        .is_empty());
    let moved = column(&board, "2024-06-20")["orders"].as_array().unwrap();
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0]["order_id"].as_str().unwrap(), id);
}

#[tokio::test]
async fn rescheduling_to_the_same_date_is_a_no_op() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Drukarnia Kolor").await;
    let order = app.seed_order(client_id, "2024-06-17").await;
    let id = order["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/delivery-date"),
            Some(json!({ "delivery_date": "2024-06-17" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["data"]["version"], 1);
}

#[tokio::test]
async fn orders_outside_the_window_stay_off_the_board() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Drukarnia Kolor").await;
    // A Saturday inside the window and a date past the last Friday.
    app.seed_order(client_id, "2024-06-15").await;
    app.seed_order(client_id, "2024-08-01").await;

    let board = read_json(app.request(Method::GET, BOARD_URI, None).await).await;
    for day in board["data"]["days"].as_array().unwrap() {
        assert!(day["orders"].as_array().unwrap().is_empty());
    }

    // Both orders are still reachable through the plain listing.
    let list = read_json(app.request(Method::GET, "/api/v1/orders", None).await).await;
    assert_eq!(list["data"]["total"], 2);
}

#[tokio::test]
async fn fulfilled_orders_drop_off_the_board() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Drukarnia Kolor").await;
    let order = app.seed_order(client_id, "2024-06-17").await;
    let id = order["data"]["id"].as_str().unwrap().to_string();

    app.request(Method::POST, &format!("/api/v1/orders/{id}/fulfill"), None)
        .await;

    let board = read_json(app.request(Method::GET, BOARD_URI, None).await).await;
    assert!(column(&board, "2024-06-17")["orders"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn in_progress_stages_remain_on_the_board() {
    let app = TestApp::new().await;
    let client_id = app.seed_client("Drukarnia Kolor").await;
    let order = app.seed_order(client_id, "2024-06-17").await;
    let id = order["data"]["id"].as_str().unwrap().to_string();

    for stage in ["in_production", "ready"] {
        app.request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/status"),
            Some(json!({ "status": stage })),
        )
        .await;

        let board = read_json(app.request(Method::GET, BOARD_URI, None).await).await;
        let orders = column(&board, "2024-06-17")["orders"].as_array().unwrap();
        assert_eq!(orders.len(), 1, "stage {stage} should stay on the board");
        assert_eq!(orders[0]["status"], stage);
    }
}
