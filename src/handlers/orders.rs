use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::order::OrderStatus;
use crate::services::orders::{
    CreateOrderRequest, OrderItemResponse, OrderListResponse, OrderResponse,
};
use crate::{errors::ServiceError, ApiResponse, AppState, ListQuery};

fn map_status_str(status: &str) -> Result<OrderStatus, ServiceError> {
    match status.to_ascii_lowercase().as_str() {
        "received" => Ok(OrderStatus::Received),
        "in_production" | "production" => Ok(OrderStatus::InProduction),
        "ready" => Ok(OrderStatus::Ready),
        "fulfilled" => Err(ServiceError::InvalidStatus(
            "Use POST /orders/:id/fulfill to mark an order fulfilled".to_string(),
        )),
        other => Err(ServiceError::InvalidStatus(format!(
            "Unknown order status: {other}"
        ))),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// One of `received`, `in_production`, `ready`.
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDeliveryDateRequest {
    pub delivery_date: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    summary = "List orders",
    description = "Get a paginated list of orders, newest first",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
    ),
    responses(
        (status = 200, description = "Orders retrieved successfully", body = ApiResponse<OrderListResponse>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<OrderListResponse>>, ServiceError> {
    let list = state
        .services
        .orders
        .list_orders(query.page, query.limit)
        .await?;
    Ok(Json(ApiResponse::success(list)))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    summary = "Create order",
    description = "Create an order with its line items in one transaction",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order number already in use", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.create_order(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    summary = "Get order",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order retrieved successfully", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let order = state
        .services
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/items",
    summary = "Get order items",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Items retrieved successfully", body = ApiResponse<Vec<OrderItemResponse>>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<OrderItemResponse>>>, ServiceError> {
    let items = state.services.orders.get_order_items(id).await?;
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    summary = "Update order status",
    description = "Move an order to another production stage; fulfilment has its own endpoint",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let target = map_status_str(&payload.status)?;
    let order = state.services.orders.update_status(id, target).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/delivery-date",
    summary = "Reschedule order",
    description = "Set a new delivery date, moving the order between dashboard days",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateDeliveryDateRequest,
    responses(
        (status = 200, description = "Delivery date updated", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_delivery_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDeliveryDateRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let order = state
        .services
        .orders
        .update_delivery_date(id, payload.delivery_date)
        .await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/fulfill",
    summary = "Fulfill order",
    description = "Mark an order fulfilled; repeated calls are no-ops",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order fulfilled", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn fulfill_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let order = state.services.orders.fulfill(id).await?;
    Ok(Json(ApiResponse::success(order)))
}
