use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./stockroom.db?mode=rwc";

const USAGE: &str = "\
Apply or inspect the stockroom schema.

Usage: migration [COMMAND]

Commands:
  up      apply pending migrations (default)
  down    revert the last applied migration
  fresh   drop every table and re-apply all migrations
  status  list applied and pending migrations
  help    print this message

The database is read from DATABASE_URL (default: sqlite:./stockroom.db?mode=rwc).";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Up,
    Down,
    Fresh,
    Status,
    Help,
}

fn parse_command(arg: Option<&str>) -> Result<Command, String> {
    match arg.unwrap_or("up") {
        "up" => Ok(Command::Up),
        "down" => Ok(Command::Down),
        "fresh" => Ok(Command::Fresh),
        "status" => Ok(Command::Status),
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => Err(format!("unknown command `{other}`")),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let arg = std::env::args().nth(1);
    let cmd = match parse_command(arg.as_deref()) {
        Ok(Command::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Ok(cmd) => cmd,
        Err(err) => {
            eprintln!("{err}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let db_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = Database::connect(&db_url).await?;

    match cmd {
        Command::Up => migration::Migrator::up(&db, None).await?,
        // Revert one step only; `fresh` is the way to start over.
        Command::Down => migration::Migrator::down(&db, Some(1)).await?,
        Command::Fresh => migration::Migrator::fresh(&db).await?,
        Command::Status => migration::Migrator::status(&db).await?,
        // Printed above, before connecting.
        Command::Help => {}
    }

    Ok(())
}
