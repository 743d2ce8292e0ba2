use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::services::clients::{
    ClientListResponse, ClientResponse, CreateClientRequest, DeliveryAddressResponse,
};
use crate::{errors::ServiceError, ApiResponse, AppState, ListQuery};

#[utoipa::path(
    get,
    path = "/api/v1/clients",
    summary = "List clients",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
    ),
    responses(
        (status = 200, description = "Clients retrieved successfully", body = ApiResponse<ClientListResponse>),
    ),
    tag = "clients"
)]
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<ClientListResponse>>, ServiceError> {
    let list = state
        .services
        .clients
        .list_clients(query.page, query.limit)
        .await?;
    Ok(Json(ApiResponse::success(list)))
}

#[utoipa::path(
    post,
    path = "/api/v1/clients",
    summary = "Register client",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created successfully", body = ApiResponse<ClientResponse>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
    ),
    tag = "clients"
)]
pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = state.services.clients.create_client(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(client))))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    summary = "Get client",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client retrieved successfully", body = ApiResponse<ClientResponse>),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse),
    ),
    tag = "clients"
)]
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ClientResponse>>, ServiceError> {
    let client = state
        .services
        .clients
        .get_client(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Client {} not found", id)))?;
    Ok(Json(ApiResponse::success(client)))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/delivery-addresses",
    summary = "List delivery addresses",
    description = "Saved delivery addresses of one client",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Addresses retrieved successfully", body = ApiResponse<Vec<DeliveryAddressResponse>>),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse),
    ),
    tag = "clients"
)]
pub async fn list_delivery_addresses(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<DeliveryAddressResponse>>>, ServiceError> {
    let addresses = state.services.clients.list_delivery_addresses(id).await?;
    Ok(Json(ApiResponse::success(addresses)))
}
