//! Decimal price type with minor-unit (cent) conversion.
//!
//! Catalog prices are stored as decimal strings in the products file; the
//! payment provider wants integer minor units. `Price` keeps the decimal
//! representation exact and converts to cents with banker's-free rounding
//! (`round(price * 100)`).

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input is not a valid decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The price is negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A price in US dollars.
///
/// Stored as a `Decimal` in the currency's standard unit (dollars, not
/// cents). The shop is single-currency, so no currency code is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price from a decimal string (e.g. `"12.99"`).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Invalid` if the string is not a decimal number,
    /// or `PriceError::Negative` for negative amounts.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s
            .trim()
            .parse()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }

    /// The decimal dollar amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Convert to integer minor units (cents) by `round(amount * 100)`.
    ///
    /// Saturates at `i64::MAX` for absurd inputs rather than panicking.
    #[must_use]
    pub fn as_cents(&self) -> i64 {
        (self.0 * Decimal::from(100))
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(i64::MAX)
    }

    /// Multiply by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Add another price.
    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
