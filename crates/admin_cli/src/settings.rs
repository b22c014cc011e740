//! Handles settings for the admin tool.
//!
//! Configuration is read from `settings.toml` (or the file passed with
//! `--config`) and then from `STOCKROOM__*` environment variables, e.g.
//! `STOCKROOM__APP__LEVEL=debug` or `STOCKROOM__DATABASE__SQLITE=./stock.db`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_SETTINGS: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite("./stockroom.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
}

impl Settings {
    /// Load settings; an explicit `path` must exist, the default file may not.
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = File::with_name(path.unwrap_or(DEFAULT_SETTINGS)).required(path.is_some());
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("STOCKROOM").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
