//! The module contains the errors the engine can return.
//!
//! The stock ledger raises two errors on invalid input:
//!
//! - [`InvalidQuantity`] when a quantity is not a non-negative number.
//! - [`StockAlreadyExists`] when an item already has a stock row at a location.
//!
//! Any other backing-store failure surfaces as [`Database`].
//!
//!  [`InvalidQuantity`]: EngineError::InvalidQuantity
//!  [`StockAlreadyExists`]: EngineError::StockAlreadyExists
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Stock already exists: {0}")]
    StockAlreadyExists(String),
    #[error("Stock not found: {0}")]
    StockNotFound(String),
    #[error("Not enough stock: {0}")]
    NotEnoughStock(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid location: {0}")]
    InvalidLocation(String),
    #[error("Location in use: {0}")]
    LocationInUse(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidQuantity(a), Self::InvalidQuantity(b)) => a == b,
            (Self::StockAlreadyExists(a), Self::StockAlreadyExists(b)) => a == b,
            (Self::StockNotFound(a), Self::StockNotFound(b)) => a == b,
            (Self::NotEnoughStock(a), Self::NotEnoughStock(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidLocation(a), Self::InvalidLocation(b)) => a == b,
            (Self::LocationInUse(a), Self::LocationInUse(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
