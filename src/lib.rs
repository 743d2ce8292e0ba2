/*!
Backend for a label-printing shop's order desk.

Orders travel through a small production lifecycle (received, in production,
ready, fulfilled) and the dashboard arranges the unfulfilled ones on a
four-week board of weekday columns keyed by delivery date.
*/

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod scheduling;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::DbPool;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DbPool>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let sender = Arc::new(event_sender.clone());
        let orders = services::OrderService::new(db.clone(), Some(sender.clone()));
        let clients = services::ClientService::new(db.clone(), Some(sender));
        let dashboard = services::DashboardService::new(orders.clone(), clients.clone());
        Self {
            db,
            config,
            event_sender,
            services: handlers::AppServices {
                orders,
                clients,
                dashboard,
            },
        }
    }
}

/// Common query parameters for list endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

/// Common response wrapper.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

/// Routes mounted under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route("/orders/:id", get(handlers::orders::get_order))
        .route("/orders/:id/items", get(handlers::orders::get_order_items))
        .route(
            "/orders/:id/status",
            put(handlers::orders::update_order_status),
        )
        .route(
            "/orders/:id/delivery-date",
            put(handlers::orders::update_delivery_date),
        )
        .route("/orders/:id/fulfill", post(handlers::orders::fulfill_order))
        .route(
            "/clients",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route("/clients/:id", get(handlers::clients::get_client))
        .route(
            "/clients/:id/delivery-addresses",
            get(handlers::clients::list_delivery_addresses),
        )
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
}

/// Full application router: health probe, versioned API and Swagger UI.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .with_state(state)
}
