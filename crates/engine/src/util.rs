//! Internal helpers for input normalization and storage error mapping.
//!
//! These utilities are **not** part of the public API.

use sea_orm::{DbErr, SqlErr};

use crate::{EngineError, ResultEngine};

/// Trim a display name and reject empty values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim free text, keeping empty input as an empty string.
pub(crate) fn normalize_text(value: &str) -> String {
    value.trim().to_string()
}

/// Trim an optional note, dropping it when blank.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Map a unique-index violation on `inventory_stocks` to `StockAlreadyExists`.
pub(crate) fn map_stock_conflict(
    err: DbErr,
    conflict: impl FnOnce() -> EngineError,
) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict(),
        _ => EngineError::Database(err),
    }
}
