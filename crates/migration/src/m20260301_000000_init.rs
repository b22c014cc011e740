//! Initial schema migration.
//!
//! Creates the inventory schema:
//!
//! - `metrics`: units of measure
//! - `categories`: item groupings
//! - `locations`: places holding stock, nested through `parent_id`
//! - `inventories`: item definitions
//! - `inventory_stocks`: quantity per `(inventory, location)` pair
//!
//! `inventories.metric_id` and `inventories.category_id` carry no foreign key:
//! the referenced row may be deleted while the item keeps the id.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Metrics {
    Table,
    Id,
    Name,
    Symbol,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Locations {
    Table,
    Id,
    Name,
    ParentId,
}

#[derive(Iden)]
enum Inventories {
    Table,
    Id,
    Name,
    Description,
    MetricId,
    CategoryId,
}

#[derive(Iden)]
pub(crate) enum InventoryStocks {
    Table,
    Id,
    InventoryId,
    LocationId,
    Quantity,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Reference data
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Metrics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Metrics::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Metrics::Name).string().not_null())
                    .col(ColumnDef::new(Metrics::Symbol).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Locations::Name).string().not_null())
                    .col(ColumnDef::new(Locations::ParentId).blob())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-locations-parent_id")
                            .from(Locations::Table, Locations::ParentId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-locations-parent_id")
                    .table(Locations::Table)
                    .col(Locations::ParentId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Inventories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inventories::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inventories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Inventories::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Inventories::MetricId).blob())
                    .col(ColumnDef::new(Inventories::CategoryId).blob())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Stock ledger
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(InventoryStocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryStocks::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InventoryStocks::InventoryId)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryStocks::LocationId)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryStocks::Quantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-inventory_stocks-inventory_id")
                            .from(InventoryStocks::Table, InventoryStocks::InventoryId)
                            .to(Inventories::Table, Inventories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-inventory_stocks-location_id")
                            .from(InventoryStocks::Table, InventoryStocks::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One stock row per item and location.
        manager
            .create_index(
                Index::create()
                    .name("idx-inventory_stocks-inventory_id-location_id-unique")
                    .table(InventoryStocks::Table)
                    .col(InventoryStocks::InventoryId)
                    .col(InventoryStocks::LocationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-inventory_stocks-location_id")
                    .table(InventoryStocks::Table)
                    .col(InventoryStocks::LocationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryStocks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inventories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Metrics::Table).to_owned())
            .await?;
        Ok(())
    }
}
