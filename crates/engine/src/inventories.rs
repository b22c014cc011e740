//! The module contains the `Inventory` item definition.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

/// A trackable item.
///
/// `metric_id` and `category_id` are plain references: they are not checked
/// when written and may point to a record that was deleted since. Resolve them
/// with `Engine::inventory_metric` / `Engine::inventory_category`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Inventory {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub metric_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

/// Input for `Engine::create_inventory`.
#[derive(Clone, Debug, Default)]
pub struct NewInventory {
    pub name: String,
    pub description: String,
    pub metric_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

impl Inventory {
    pub(crate) fn new(input: NewInventory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            metric_id: input.metric_id,
            category_id: input.category_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inventories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub metric_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_stocks::Entity")]
    Stocks,
}

impl Related<super::inventory_stocks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stocks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Inventory {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            metric_id: model.metric_id,
            category_id: model.category_id,
        }
    }
}

impl From<&Inventory> for ActiveModel {
    fn from(value: &Inventory) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            metric_id: ActiveValue::Set(value.metric_id),
            category_id: ActiveValue::Set(value.category_id),
        }
    }
}
