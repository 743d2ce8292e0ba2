use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Production stage of an order. The numeric values are the ones stored in the
/// `orders.status` column; they are kept stable because external reporting reads
/// the raw column.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    ToSchema,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted for production, not started yet.
    #[sea_orm(num_value = 0)]
    Received,
    /// On the production floor.
    #[sea_orm(num_value = 1)]
    InProduction,
    /// Printed and packed, waiting for dispatch.
    #[sea_orm(num_value = 2)]
    Ready,
    /// Shipped and closed. Terminal: fulfilled orders never return to an
    /// earlier stage and are dropped from the dashboard.
    #[sea_orm(num_value = 3)]
    Fulfilled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Fulfilled
    }

    /// Human-readable stage label used on cards and documents.
    pub fn display_name(self) -> &'static str {
        match self {
            OrderStatus::Received => "Received",
            OrderStatus::InProduction => "In production",
            OrderStatus::Ready => "Ready to ship",
            OrderStatus::Fulfilled => "Fulfilled",
        }
    }
}

/// The `orders` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Unique order number in the `ZAM-YYYY-NNN` format.
    pub order_number: String,

    pub client_id: Uuid,
    pub status: OrderStatus,

    /// Date the order was taken.
    pub order_date: NaiveDate,

    /// Promised delivery date; drives dashboard placement and urgency.
    pub delivery_date: NaiveDate,

    pub notes: Option<String>,
    pub payment_term: Option<String>,

    // Per-order delivery address override. When unset, the client's own
    // address applies.
    pub delivery_company: Option<String>,
    pub delivery_street: Option<String>,
    pub delivery_postal_code: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_contact_person: Option<String>,
    pub delivery_phone: Option<String>,

    /// Login of the user who entered the order.
    pub created_by: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Client,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            if let ActiveValue::NotSet = active_model.created_at {
                active_model.created_at = Set(now);
            }
        }

        if let ActiveValue::NotSet = active_model.updated_at {
            active_model.updated_at = Set(Some(now));
        }

        Ok(active_model)
    }
}
