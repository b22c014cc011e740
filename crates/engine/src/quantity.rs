use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::EngineError;

const SCALE: i64 = 100;

/// Non-negative stock quantity represented as **integer hundredths**.
///
/// Use this type for every quantity the engine stores (stock levels, movement
/// before/after values) to avoid floating-point drift.
///
/// A `Quantity` can only be built from valid input, so a value of this type is
/// always a number `>= 0` with at most 2 decimals.
///
/// # Examples
///
/// ```rust
/// use engine::Quantity;
///
/// let qty = Quantity::from_units(10);
/// assert_eq!(qty.hundredths(), 1000);
/// assert_eq!(qty.to_string(), "10.00");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// negatives and more than 2 decimals):
///
/// ```rust
/// use engine::Quantity;
///
/// assert_eq!("10,5".parse::<Quantity>().unwrap().hundredths(), 1050);
/// assert!("-1".parse::<Quantity>().is_err());
/// assert!("not a number".parse::<Quantity>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Quantity(i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    /// Creates a quantity from whole units. Every `u32` fits, so this cannot fail.
    #[must_use]
    pub const fn from_units(units: u32) -> Self {
        Self(units as i64 * SCALE)
    }

    /// Creates a quantity from raw hundredths.
    pub fn from_hundredths(hundredths: u64) -> Result<Self, EngineError> {
        i64::try_from(hundredths)
            .map(Self)
            .map_err(|_| too_large())
    }

    /// Returns the raw value in hundredths.
    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Returns `true` if the quantity is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition (fails with `InvalidQuantity` on overflow).
    pub fn checked_add(self, rhs: Quantity) -> Result<Quantity, EngineError> {
        self.0.checked_add(rhs.0).map(Quantity).ok_or_else(too_large)
    }

    /// Checked subtraction (returns `None` when the result would be negative).
    #[must_use]
    pub fn checked_sub(self, rhs: Quantity) -> Option<Quantity> {
        let value = self.0.checked_sub(rhs.0)?;
        (value >= 0).then_some(Quantity(value))
    }

    /// Rebuild a quantity read back from storage.
    pub(crate) fn from_stored(value: i64, label: &str) -> Result<Self, EngineError> {
        if value < 0 {
            return Err(EngineError::InvalidQuantity(format!(
                "stored {label} is negative: {value}"
            )));
        }
        Ok(Self(value))
    }
}

fn too_large() -> EngineError {
    EngineError::InvalidQuantity("quantity too large".to_string())
}

fn negative() -> EngineError {
    EngineError::InvalidQuantity("quantity must not be negative".to_string())
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.0 / SCALE;
        let fraction = self.0 % SCALE;
        write!(f, "{units}.{fraction:02}")
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl FromStr for Quantity {
    type Err = EngineError;

    /// Parses a decimal string into hundredths.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`.
    ///
    /// Validation rules:
    /// - rejects empty strings and anything that is not a plain decimal number
    /// - rejects negative values
    /// - max 2 fractional digits (rejects `1.234`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidQuantity(format!("'{}' is not a number", s.trim()));

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidQuantity("empty quantity".to_string()));
        }
        if trimmed.starts_with('-') {
            return Err(negative());
        }
        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed).replace(',', ".");

        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let fraction_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let units: i64 = units_str.parse().map_err(|_| too_large())?;

        let fraction: i64 = match fraction_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => {
                        return Err(EngineError::InvalidQuantity(
                            "too many decimals".to_string(),
                        ));
                    }
                }
            }
        };

        units
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(fraction))
            .map(Quantity)
            .ok_or_else(too_large)
    }
}

impl TryFrom<&str> for Quantity {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Quantity {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&String> for Quantity {
    type Error = EngineError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<i64> for Quantity {
    type Error = EngineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(negative());
        }
        value.checked_mul(SCALE).map(Quantity).ok_or_else(too_large)
    }
}

impl TryFrom<i32> for Quantity {
    type Error = EngineError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Quantity::try_from(i64::from(value))
    }
}

impl TryFrom<u32> for Quantity {
    type Error = EngineError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(Quantity::from_units(value))
    }
}

impl TryFrom<f64> for Quantity {
    type Error = EngineError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(EngineError::InvalidQuantity(format!(
                "{value} is not a number"
            )));
        }
        // `-0.0` counts as negative, like the string "-0".
        if value.is_sign_negative() {
            return Err(negative());
        }
        let scaled = value * SCALE as f64;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(EngineError::InvalidQuantity(
                "too many decimals".to_string(),
            ));
        }
        if rounded >= i64::MAX as f64 {
            return Err(too_large());
        }
        Ok(Quantity(rounded as i64))
    }
}
