//! Units of measure attached to inventory items.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use uuid::Uuid;

/// A unit of measure, e.g. "Litres" with symbol "L".
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub id: Uuid,
    pub name: String,
    pub symbol: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub symbol: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Metric {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            symbol: model.symbol,
        }
    }
}
