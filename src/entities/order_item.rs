use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single label position on an order: one material in one size, priced per
/// unit or per thousand. Items have no lifecycle of their own; they live and
/// die with their order.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,

    pub material: String,
    /// Label width in millimetres.
    pub width: Decimal,
    /// Label height in millimetres.
    pub height: Decimal,
    /// Running metres on a roll, when ordered as rolls.
    pub roll_length: Option<Decimal>,
    /// Core diameter of the roll, free-form ("40", "76"...).
    pub core_size: Option<String>,

    pub quantity: Decimal,
    /// Unit the quantity is expressed in ("pcs", "rolls", "thousand").
    pub quantity_unit: String,

    pub unit_price: Decimal,
    /// Whether `unit_price` applies per unit or per thousand labels.
    pub price_type: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
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
