//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::{Price, PriceError};

/// A product entry from the catalog JSON file.
///
/// All fields are strings in the file, including `price` (a decimal string
/// like `"12.99"`). Products carry no persisted id: identity is the
/// positional index in the file, re-derived on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display title.
    pub title: String,
    /// Decimal price string (e.g. `"12.99"`).
    pub price: String,
    /// External listing link.
    pub link: String,
    /// Product image URL.
    pub image_url: String,
}

impl Product {
    /// Parse the price string into a [`Price`].
    ///
    /// # Errors
    ///
    /// Returns `PriceError` when the stored string is not a valid
    /// non-negative decimal.
    pub fn price(&self) -> Result<Price, PriceError> {
        Price::parse(&self.price)
    }
}
