use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::order::OrderStatus;
use crate::errors::ErrorResponse;
use crate::scheduling::UrgencyBand;
use crate::services::clients::{
    ClientListResponse, ClientResponse, CreateClientRequest, DeliveryAddressResponse,
};
use crate::services::dashboard::{DashboardBoard, DayColumn, OrderCard};
use crate::services::orders::{
    CreateOrderItemRequest, CreateOrderRequest, OrderItemResponse, OrderListResponse,
    OrderResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Labelpress API",
        version = "0.3.0",
        description = r#"
Order desk for a label-printing shop.

Orders carry a production status (received, in production, ready, fulfilled)
and a delivery date. The dashboard lays unfulfilled orders out on a four-week
board of weekday columns, colour-coded by how many workdays remain until
delivery.
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "orders", description = "Order intake and lifecycle"),
        (name = "clients", description = "Client register and delivery addresses"),
        (name = "dashboard", description = "Production board")
    ),
    paths(
        crate::handlers::orders::list_orders,
        crate::handlers::orders::create_order,
        crate::handlers::orders::get_order,
        crate::handlers::orders::get_order_items,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::update_delivery_date,
        crate::handlers::orders::fulfill_order,
        crate::handlers::clients::list_clients,
        crate::handlers::clients::create_client,
        crate::handlers::clients::get_client,
        crate::handlers::clients::list_delivery_addresses,
        crate::handlers::dashboard::get_dashboard,
    ),
    components(schemas(
        OrderStatus,
        UrgencyBand,
        ErrorResponse,
        CreateOrderRequest,
        CreateOrderItemRequest,
        OrderResponse,
        OrderItemResponse,
        OrderListResponse,
        CreateClientRequest,
        ClientResponse,
        ClientListResponse,
        DeliveryAddressResponse,
        DashboardBoard,
        DayColumn,
        OrderCard,
    ))
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDocV1::openapi();
        let json = serde_json::to_string(&doc).expect("document should serialize");
        assert!(json.contains("/api/v1/dashboard"));
        assert!(json.contains("/api/v1/orders/{id}/fulfill"));
    }
}
