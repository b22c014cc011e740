//! The module contains `InventoryStock`, the quantity of one item held at one
//! location.
//!
//! The `(inventory_id, location_id)` pair is unique. The unique index lives in
//! the schema, so a second row for the same pair is rejected by the database
//! even when two writers race past the engine's own pre-check.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{Quantity, ResultEngine};

/// Quantity of an inventory item held at a location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InventoryStock {
    pub id: Uuid,
    pub inventory_id: Uuid,
    pub location_id: Uuid,
    pub quantity: Quantity,
}

impl InventoryStock {
    /// Build an unsaved, empty stock for the given pair.
    pub(crate) fn new(inventory_id: Uuid, location_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            inventory_id,
            location_id,
            quantity: Quantity::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inventory_stocks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub inventory_id: Uuid,
    pub location_id: Uuid,
    pub quantity: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventories::Entity",
        from = "Column::InventoryId",
        to = "super::inventories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Inventories,
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::LocationId",
        to = "super::locations::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Locations,
    #[sea_orm(has_many = "super::stock_movements::Entity")]
    Movements,
}

impl Related<super::inventories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventories.def()
    }
}

impl Related<super::locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locations.def()
    }
}

impl Related<super::stock_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for InventoryStock {
    type Error = crate::EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            inventory_id: model.inventory_id,
            location_id: model.location_id,
            quantity: Quantity::from_stored(model.quantity, "quantity")?,
        })
    }
}

impl From<&InventoryStock> for ActiveModel {
    fn from(value: &InventoryStock) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            inventory_id: ActiveValue::Set(value.inventory_id),
            location_id: ActiveValue::Set(value.location_id),
            quantity: ActiveValue::Set(value.quantity.hundredths()),
        }
    }
}
