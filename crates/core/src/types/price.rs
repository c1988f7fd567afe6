//! Minor-unit price representation.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price in integer minor units (cents for USD) with its currency code.
///
/// Minor units keep local price sorting exact; upstream decimal strings
/// are converted once at the normalization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the smallest currency unit.
    pub minor_units: i64,
    /// ISO 4217 currency code. Never empty.
    pub currency: String,
}

impl Price {
    /// Create a price from minor units.
    #[must_use]
    pub fn new(minor_units: i64, currency: impl Into<String>) -> Self {
        Self {
            minor_units,
            currency: currency.into(),
        }
    }

    /// Convert a decimal major-unit amount (e.g. `19.99`) into minor units.
    ///
    /// Returns `None` when the scaled amount does not fit in `i64`.
    #[must_use]
    pub fn from_decimal(amount: Decimal, currency: impl Into<String>) -> Option<Self> {
        let minor = (amount * Decimal::ONE_HUNDRED).round().to_i64()?;
        Some(Self {
            minor_units: minor,
            currency: currency.into(),
        })
    }
}
