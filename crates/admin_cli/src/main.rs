use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, NewInventory};
use migration::{Migrator, MigratorTrait};
use serde::Serialize;
use settings::Settings;
use uuid::Uuid;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "stockroom_admin")]
#[command(about = "Admin utilities for Stockroom (bootstrap items, locations and stock)")]
struct Cli {
    /// Settings file (TOML). Defaults to `settings.toml` when present.
    #[arg(long)]
    config: Option<String>,

    /// Database connection string; overrides the settings file.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Metric(Metric),
    Category(Category),
    Location(Location),
    Item(Item),
    Stock(Stock),
}

#[derive(Args, Debug)]
struct Metric {
    #[command(subcommand)]
    command: MetricCommand,
}

#[derive(Subcommand, Debug)]
enum MetricCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
    },
    List,
}

#[derive(Args, Debug)]
struct Category {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    Create {
        #[arg(long)]
        name: String,
    },
    List,
}

#[derive(Args, Debug)]
struct Location {
    #[command(subcommand)]
    command: LocationCommand,
}

#[derive(Subcommand, Debug)]
enum LocationCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        parent: Option<Uuid>,
    },
    List,
}

#[derive(Args, Debug)]
struct Item {
    #[command(subcommand)]
    command: ItemCommand,
}

#[derive(Subcommand, Debug)]
enum ItemCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        metric: Option<Uuid>,
        #[arg(long)]
        category: Option<Uuid>,
    },
    /// Show an item with its stock per location.
    Show {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Args, Debug)]
struct Stock {
    #[command(subcommand)]
    command: StockCommand,
}

#[derive(Args, Debug)]
struct Adjustment {
    #[arg(long)]
    item: Uuid,
    #[arg(long)]
    location: Uuid,
    /// Decimal quantity, e.g. `10` or `2.5`.
    #[arg(long)]
    quantity: String,
    #[arg(long)]
    reason: Option<String>,
}

#[derive(Subcommand, Debug)]
enum StockCommand {
    Create {
        #[arg(long)]
        item: Uuid,
        #[arg(long)]
        location: Uuid,
        #[arg(long)]
        quantity: String,
    },
    Add(Adjustment),
    Take(Adjustment),
    Move {
        #[arg(long)]
        item: Uuid,
        #[arg(long)]
        from: Uuid,
        #[arg(long)]
        to: Uuid,
    },
    Movements {
        #[arg(long)]
        stock: Uuid,
    },
}

#[derive(Serialize)]
struct ItemReport {
    item: engine::Inventory,
    metric: Option<engine::Metric>,
    category: Option<engine::Category>,
    total: engine::Quantity,
    stocks: Vec<engine::InventoryStock>,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "stockroom_admin={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database.url());
    tracing::debug!("connecting to {url}");
    let db = sea_orm::Database::connect(&url).await?;
    Migrator::up(&db, None).await?;

    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Metric(metric) => match metric.command {
            MetricCommand::Create { name, symbol } => {
                print_json(&engine.create_metric(&name, &symbol).await?)?
            }
            MetricCommand::List => print_json(&engine.metrics().await?)?,
        },
        Command::Category(category) => match category.command {
            CategoryCommand::Create { name } => print_json(&engine.create_category(&name).await?)?,
            CategoryCommand::List => print_json(&engine.categories().await?)?,
        },
        Command::Location(location) => match location.command {
            LocationCommand::Create { name, parent } => {
                print_json(&engine.create_location(&name, parent).await?)?
            }
            LocationCommand::List => print_json(&engine.locations().await?)?,
        },
        Command::Item(item) => match item.command {
            ItemCommand::Create {
                name,
                description,
                metric,
                category,
            } => {
                let created = engine
                    .create_inventory(NewInventory {
                        name,
                        description,
                        metric_id: metric,
                        category_id: category,
                    })
                    .await?;
                tracing::info!("created item {}", created.id);
                print_json(&created)?
            }
            ItemCommand::Show { id } => {
                let report = ItemReport {
                    item: engine.inventory(id).await?,
                    metric: engine.inventory_metric(id).await?,
                    category: engine.inventory_category(id).await?,
                    total: engine.total_stock(id).await?,
                    stocks: engine.stocks(id).await?,
                };
                print_json(&report)?
            }
        },
        Command::Stock(stock) => match stock.command {
            StockCommand::Create {
                item,
                location,
                quantity,
            } => print_json(
                &engine
                    .create_stock_on_location(item, quantity.as_str(), location)
                    .await?,
            )?,
            StockCommand::Add(adj) => print_json(
                &engine
                    .add_to_location(
                        adj.item,
                        adj.location,
                        adj.quantity.as_str(),
                        adj.reason.as_deref(),
                    )
                    .await?,
            )?,
            StockCommand::Take(adj) => print_json(
                &engine
                    .take_from_location(
                        adj.item,
                        adj.location,
                        adj.quantity.as_str(),
                        adj.reason.as_deref(),
                    )
                    .await?,
            )?,
            StockCommand::Move { item, from, to } => {
                print_json(&engine.move_stock(item, from, to).await?)?
            }
            StockCommand::Movements { stock } => {
                print_json(&engine.stock_movements(stock).await?)?
            }
        },
    }

    Ok(())
}
