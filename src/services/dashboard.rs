use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::order::{Model as OrderModel, OrderStatus},
    errors::ServiceError,
    scheduling::{self, UrgencyBand},
    services::clients::ClientService,
    services::orders::OrderService,
};

/// One order as it appears on a dashboard day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderCard {
    pub order_id: Uuid,
    pub order_number: String,
    pub client_id: Uuid,
    /// Empty when the client record is gone; the card still shows.
    pub client_name: String,
    pub client_short_name: Option<String>,
    pub status: OrderStatus,
    pub status_label: String,
    pub delivery_date: NaiveDate,
    pub workdays_left: i64,
    pub urgency: UrgencyBand,
    pub accent_color: String,
}

/// One weekday column of the board.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub orders: Vec<OrderCard>,
}

/// The four-week production board.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardBoard {
    pub today: NaiveDate,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub days: Vec<DayColumn>,
}

/// Read-side service assembling the production board. Every call rebuilds the
/// board from a fresh read; nothing is cached between requests.
#[derive(Clone)]
pub struct DashboardService {
    orders: OrderService,
    clients: ClientService,
}

impl DashboardService {
    pub fn new(orders: OrderService, clients: ClientService) -> Self {
        Self { orders, clients }
    }

    /// Builds the board for today.
    pub async fn board(&self) -> Result<DashboardBoard, ServiceError> {
        self.board_for(Utc::now().date_naive()).await
    }

    /// Builds the board for an arbitrary reference date. Fulfilled orders are
    /// already filtered out of the underlying read; orders whose delivery date
    /// falls outside the window simply do not appear.
    #[instrument(skip(self), fields(today = %today))]
    pub async fn board_for(&self, today: NaiveDate) -> Result<DashboardBoard, ServiceError> {
        let active_orders = self.orders.list_active().await?;
        let clients = self.clients.list_all().await?;
        let clients_by_id: HashMap<Uuid, _> =
            clients.into_iter().map(|c| (c.id, c)).collect();

        let buckets = scheduling::assign_to_buckets(today, active_orders, |o| o.delivery_date);

        let days: Vec<DayColumn> = buckets
            .into_iter()
            .map(|bucket| DayColumn {
                date: bucket.date,
                orders: bucket
                    .entries
                    .into_iter()
                    .map(|order| to_card(today, order, &clients_by_id))
                    .collect(),
            })
            .collect();

        let first_date = days.first().map(|d| d.date).unwrap_or(today);
        let last_date = days.last().map(|d| d.date).unwrap_or(today);

        Ok(DashboardBoard {
            today,
            first_date,
            last_date,
            days,
        })
    }
}

fn to_card(
    today: NaiveDate,
    order: OrderModel,
    clients_by_id: &HashMap<Uuid, crate::entities::client::Model>,
) -> OrderCard {
    let (client_name, client_short_name) = match clients_by_id.get(&order.client_id) {
        Some(client) => (client.name.clone(), client.short_name.clone()),
        None => {
            warn!(order_id = %order.id, client_id = %order.client_id, "Order references missing client");
            (String::new(), None)
        }
    };

    let (workdays_left, urgency) = UrgencyBand::classify(today, order.delivery_date);

    OrderCard {
        order_id: order.id,
        order_number: order.order_number,
        client_id: order.client_id,
        client_name,
        client_short_name,
        status: order.status,
        status_label: order.status.display_name().to_string(),
        delivery_date: order.delivery_date,
        workdays_left,
        urgency,
        accent_color: urgency.accent_color().to_string(),
    }
}
