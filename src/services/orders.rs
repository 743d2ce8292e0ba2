use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::client::Entity as ClientEntity,
    entities::order::{
        self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel,
        OrderStatus,
    },
    entities::order_item::{
        self, ActiveModel as OrderItemActiveModel, Entity as OrderItemEntity,
        Model as OrderItemModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Order numbers look like `ZAM-2024-017`: year of the order date plus a
/// per-year sequence.
static ORDER_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ZAM-\d{4}-\d{3}$").expect("order number pattern is valid"));

fn format_order_number(year: i32, seq: u64) -> String {
    format!("ZAM-{}-{:03}", year, seq)
}

/// Highest sequence among stored numbers sharing `prefix`; 0 when none parse.
fn max_sequence(prefix: &str, numbers: &[String]) -> u64 {
    numbers
        .iter()
        .filter_map(|n| n.strip_prefix(prefix)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

/// Request/response types for the order service
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderItemRequest {
    #[validate(length(min = 1, message = "Material is required"))]
    pub material: String,
    pub width: Decimal,
    pub height: Decimal,
    pub roll_length: Option<Decimal>,
    pub core_size: Option<String>,
    pub quantity: Decimal,
    #[validate(length(min = 1, message = "Quantity unit is required"))]
    pub quantity_unit: String,
    pub unit_price: Decimal,
    #[validate(length(min = 1, message = "Price type is required"))]
    pub price_type: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub client_id: Uuid,
    /// Explicit order number; assigned from the yearly sequence when absent.
    pub order_number: Option<String>,
    /// Defaults to today.
    pub order_date: Option<NaiveDate>,
    pub delivery_date: NaiveDate,
    pub notes: Option<String>,
    pub payment_term: Option<String>,
    pub delivery_company: Option<String>,
    pub delivery_street: Option<String>,
    pub delivery_postal_code: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_contact_person: Option<String>,
    pub delivery_phone: Option<String>,
    pub created_by: Option<String>,
    #[validate]
    #[serde(default)]
    pub items: Vec<CreateOrderItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub client_id: Uuid,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub notes: Option<String>,
    pub payment_term: Option<String>,
    pub delivery_company: Option<String>,
    pub delivery_street: Option<String>,
    pub delivery_postal_code: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_contact_person: Option<String>,
    pub delivery_phone: Option<String>,
    pub created_by: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: Option<chrono::DateTime<Utc>>,
    pub version: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub material: String,
    pub width: Decimal,
    pub height: Decimal,
    pub roll_length: Option<Decimal>,
    pub core_size: Option<String>,
    pub quantity: Decimal,
    pub quantity_unit: String,
    pub unit_price: Decimal,
    pub price_type: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service for order intake and lifecycle operations.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates an order together with its line items in one transaction.
    #[instrument(skip(self, request), fields(client_id = %request.client_id))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        for item in &request.items {
            if item.quantity <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Item quantity must be positive".to_string(),
                ));
            }
            if item.width <= Decimal::ZERO || item.height <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Item dimensions must be positive".to_string(),
                ));
            }
        }

        let db = &*self.db_pool;

        // The client reference must resolve at intake; only later reads
        // tolerate a dangling one.
        ClientEntity::find_by_id(request.client_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!("Unknown client {}", request.client_id))
            })?;

        let order_date = request.order_date.unwrap_or_else(|| Utc::now().date_naive());
        let order_number = match request.order_number {
            Some(number) => {
                if !ORDER_NUMBER_RE.is_match(&number) {
                    return Err(ServiceError::ValidationError(format!(
                        "Order number '{}' does not match ZAM-YYYY-NNN",
                        number
                    )));
                }
                number
            }
            None => self.next_order_number(order_date).await?,
        };

        let order_id = Uuid::new_v4();
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::DatabaseError(e)
        })?;

        let order_active_model = OrderActiveModel {
            id: Set(order_id),
            order_number: Set(order_number.clone()),
            client_id: Set(request.client_id),
            status: Set(OrderStatus::Received),
            order_date: Set(order_date),
            delivery_date: Set(request.delivery_date),
            notes: Set(request.notes),
            payment_term: Set(request.payment_term),
            delivery_company: Set(request.delivery_company),
            delivery_street: Set(request.delivery_street),
            delivery_postal_code: Set(request.delivery_postal_code),
            delivery_city: Set(request.delivery_city),
            delivery_contact_person: Set(request.delivery_contact_person),
            delivery_phone: Set(request.delivery_phone),
            created_by: Set(request.created_by),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            version: Set(1),
        };

        let order_model = order_active_model.insert(&txn).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                return ServiceError::InvalidOperation(format!(
                    "Order number '{}' is already in use",
                    order_number
                ));
            }
            error!(error = %e, order_id = %order_id, "Failed to create order");
            ServiceError::DatabaseError(e)
        })?;

        for item in request.items {
            let item_active_model = OrderItemActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                material: Set(item.material),
                width: Set(item.width),
                height: Set(item.height),
                roll_length: Set(item.roll_length),
                core_size: Set(item.core_size),
                quantity: Set(item.quantity),
                quantity_unit: Set(item.quantity_unit),
                unit_price: Set(item.unit_price),
                price_type: Set(item.price_type),
                created_at: Set(now),
                updated_at: Set(Some(now)),
            };
            item_active_model.insert(&txn).await.map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to create order item");
                ServiceError::DatabaseError(e)
            })?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, order_number = %order_number, "Order created");
        self.emit(Event::OrderCreated(order_id)).await;

        Ok(model_to_response(order_model))
    }

    /// Next free number in the order-date year's sequence: one past the
    /// highest `ZAM-<year>-NNN` already stored. A plain row count would
    /// collide with explicitly supplied numbers.
    async fn next_order_number(&self, order_date: NaiveDate) -> Result<String, ServiceError> {
        let db = &*self.db_pool;
        let year = order_date.year();
        let prefix = format!("ZAM-{}-", year);

        let numbers: Vec<String> = OrderEntity::find()
            .select_only()
            .column(order::Column::OrderNumber)
            .filter(order::Column::OrderNumber.starts_with(&prefix))
            .into_tuple()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(format_order_number(year, max_sequence(&prefix, &numbers) + 1))
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderResponse>, ServiceError> {
        let order = OrderEntity::find_by_id(order_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(order.map(model_to_response))
    }

    /// Lists orders newest first, with pagination.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<OrderListResponse, ServiceError> {
        let paginator = OrderEntity::find()
            .order_by_desc(order::Column::OrderDate)
            .paginate(&*self.db_pool, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count orders");
            ServiceError::DatabaseError(e)
        })?;

        let orders = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| {
                error!(error = %e, page, per_page, "Failed to fetch orders page");
                ServiceError::DatabaseError(e)
            })?;

        Ok(OrderListResponse {
            orders: orders.into_iter().map(model_to_response).collect(),
            total,
            page,
            per_page,
        })
    }

    /// All orders still on the production floor, i.e. everything except
    /// fulfilled ones. The dashboard rebuilds itself from this read.
    pub async fn list_active(&self) -> Result<Vec<OrderModel>, ServiceError> {
        OrderEntity::find()
            .filter(order::Column::Status.ne(OrderStatus::Fulfilled))
            .order_by_asc(order::Column::DeliveryDate)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Line items of one order.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order_items(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemResponse>, ServiceError> {
        let order = OrderEntity::find_by_id(order_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let items = order
            .find_related(OrderItemEntity)
            .order_by_asc(order_item::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(items.into_iter().map(item_to_response).collect())
    }

    /// Moves an order to another production stage.
    ///
    /// A same-stage request is a no-op detected before any write. Fulfilled is
    /// not a valid target here (see [`fulfill`](Self::fulfill)) and fulfilled
    /// orders reject every stage change.
    #[instrument(skip(self), fields(order_id = %order_id, target = %target))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        target: OrderStatus,
    ) -> Result<OrderResponse, ServiceError> {
        if target == OrderStatus::Fulfilled {
            return Err(ServiceError::InvalidStatus(
                "Orders are fulfilled through the explicit fulfil operation".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let order = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to fetch order for status update");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let old_status = order.status;

        if old_status == target {
            info!(order_id = %order_id, status = %target, "Status unchanged, skipping write");
            return Ok(model_to_response(order));
        }

        if old_status.is_terminal() {
            return Err(ServiceError::InvalidStatus(format!(
                "Order {} is fulfilled and cannot change stage",
                order.order_number
            )));
        }

        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let mut active: OrderActiveModel = order.into();
        active.status = Set(target);
        active.updated_at = Set(Some(Utc::now()));
        let current_version = *active.version.as_ref();
        active.version = Set(current_version + 1);

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to update order status");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit status update");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            order_id = %order_id,
            old_status = %old_status,
            new_status = %target,
            "Order status updated"
        );

        self.emit(Event::OrderStatusChanged {
            order_id,
            old_status,
            new_status: target,
        })
        .await;

        Ok(model_to_response(updated))
    }

    /// Marks an order fulfilled: the only way into the terminal stage, and a
    /// no-op when the order already is.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn fulfill(&self, order_id: Uuid) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db_pool;
        let order = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let old_status = order.status;
        if old_status == OrderStatus::Fulfilled {
            info!(order_id = %order_id, "Order already fulfilled, skipping write");
            return Ok(model_to_response(order));
        }

        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let mut active: OrderActiveModel = order.into();
        active.status = Set(OrderStatus::Fulfilled);
        active.updated_at = Set(Some(Utc::now()));
        let current_version = *active.version.as_ref();
        active.version = Set(current_version + 1);

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to mark order fulfilled");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit fulfilment");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, order_number = %updated.order_number, "Order fulfilled");

        self.emit(Event::OrderStatusChanged {
            order_id,
            old_status,
            new_status: OrderStatus::Fulfilled,
        })
        .await;
        self.emit(Event::OrderFulfilled(order_id)).await;

        Ok(model_to_response(updated))
    }

    /// Reschedules an order to a new delivery date: the drag-and-drop move
    /// between day buckets. One single-row write; on failure the stored date
    /// stays as it was and the caller re-reads the board.
    #[instrument(skip(self), fields(order_id = %order_id, new_date = %new_date))]
    pub async fn update_delivery_date(
        &self,
        order_id: Uuid,
        new_date: NaiveDate,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db_pool;
        let order = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let old_date = order.delivery_date;
        if old_date == new_date {
            info!(order_id = %order_id, "Delivery date unchanged, skipping write");
            return Ok(model_to_response(order));
        }

        let mut active: OrderActiveModel = order.into();
        active.delivery_date = Set(new_date);
        active.updated_at = Set(Some(Utc::now()));
        let current_version = *active.version.as_ref();
        active.version = Set(current_version + 1);

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to update delivery date");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, %old_date, %new_date, "Order rescheduled");

        self.emit(Event::OrderRescheduled {
            order_id,
            old_date,
            new_date,
        })
        .await;

        Ok(model_to_response(updated))
    }

    async fn emit(&self, event: Event) {
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(event).await {
                warn!("Failed to send event: {}", e);
            }
        }
    }
}

fn model_to_response(model: OrderModel) -> OrderResponse {
    OrderResponse {
        id: model.id,
        order_number: model.order_number,
        client_id: model.client_id,
        status: model.status,
        order_date: model.order_date,
        delivery_date: model.delivery_date,
        notes: model.notes,
        payment_term: model.payment_term,
        delivery_company: model.delivery_company,
        delivery_street: model.delivery_street,
        delivery_postal_code: model.delivery_postal_code,
        delivery_city: model.delivery_city,
        delivery_contact_person: model.delivery_contact_person,
        delivery_phone: model.delivery_phone,
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
        version: model.version,
    }
}

fn item_to_response(model: OrderItemModel) -> OrderItemResponse {
    OrderItemResponse {
        id: model.id,
        order_id: model.order_id,
        material: model.material,
        width: model.width,
        height: model.height,
        roll_length: model.roll_length,
        core_size: model.core_size,
        quantity: model.quantity,
        quantity_unit: model.quantity_unit,
        unit_price: model.unit_price,
        price_type: model.price_type,
    }
}
