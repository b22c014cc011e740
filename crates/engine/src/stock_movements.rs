//! Append-only history of stock quantity changes.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{Quantity, ResultEngine};

/// One quantity change on an `InventoryStock`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub stock_id: Uuid,
    pub before: Quantity,
    pub after: Quantity,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    pub(crate) fn new(
        stock_id: Uuid,
        before: Quantity,
        after: Quantity,
        reason: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            stock_id,
            before,
            after,
            reason,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub stock_id: Uuid,
    pub quantity_before: i64,
    pub quantity_after: i64,
    pub reason: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_stocks::Entity",
        from = "Column::StockId",
        to = "super::inventory_stocks::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Stocks,
}

impl Related<super::inventory_stocks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stocks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for StockMovement {
    type Error = crate::EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            stock_id: model.stock_id,
            before: Quantity::from_stored(model.quantity_before, "movement before")?,
            after: Quantity::from_stored(model.quantity_after, "movement after")?,
            reason: model.reason,
            created_at: model.created_at,
        })
    }
}

impl From<&StockMovement> for ActiveModel {
    fn from(value: &StockMovement) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            stock_id: ActiveValue::Set(value.stock_id),
            quantity_before: ActiveValue::Set(value.before.hundredths()),
            quantity_after: ActiveValue::Set(value.after.hundredths()),
            reason: ActiveValue::Set(value.reason.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}
