//! Session cart model.
//!
//! The cart is a plain list of line items held in the (server-side) session;
//! there is no cart table. One browser session owns exactly one cart, so all
//! operations are simple read-modify-write with no locking.
//!
//! Line identity is the triple (`product_id`, `variant`, `color`): adding a
//! duplicate increments the existing line's quantity instead of appending.
//! Removal is deliberately coarser and matches by `product_id` alone,
//! dropping every variant/color line for that product.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductIndex};

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Positional catalog index of the product.
    pub product_id: ProductIndex,
    /// Product display name as shown at add time.
    pub name: String,
    /// Unit price in dollars.
    pub price: Price,
    /// Quantity, always >= 1.
    pub quantity: u32,
    /// Selected size variant ("" when none).
    #[serde(default)]
    pub variant: String,
    /// Selected color ("" when none).
    #[serde(default)]
    pub color: String,
    /// Product image URL for display.
    #[serde(default)]
    pub image: String,
}

impl CartItem {
    /// Line subtotal (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A session-scoped shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item, merging into an existing line when the
    /// (`product_id`, `variant`, `color`) key matches.
    pub fn add(&mut self, item: CartItem) {
        let quantity = item.quantity.max(1);
        if let Some(existing) = self.items.iter_mut().find(|line| {
            line.product_id == item.product_id
                && line.variant == item.variant
                && line.color == item.color
        }) {
            existing.quantity += quantity;
        } else {
            self.items.push(CartItem { quantity, ..item });
        }
    }

    /// Set the quantity of the first line matching `product_id`, clamped to
    /// a minimum of 1. No-op when the product is not in the cart.
    pub fn update(&mut self, product_id: ProductIndex, quantity: u32) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            item.quantity = quantity.max(1);
        }
    }

    /// Remove every line with the given product id, regardless of variant
    /// or color.
    pub fn remove(&mut self, product_id: ProductIndex) {
        self.items.retain(|line| line.product_id != product_id);
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        let sum: Decimal = self
            .items
            .iter()
            .map(|line| line.line_total().amount())
            .sum();
        // Line totals are non-negative, so the sum is too.
        Price::new(sum).unwrap_or_default()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(product_id: usize, variant: &str, color: &str, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductIndex::new(product_id),
            name: format!("Topper {product_id}"),
            price: Price::parse("12.99").unwrap(),
            quantity,
            variant: variant.to_owned(),
            color: color.to_owned(),
            image: String::new(),
        }
    }

    #[test]
    fn test_add_merges_matching_key() {
        let mut cart = Cart::new();
        cart.add(item(1, "Small", "Pink", 1));
        cart.add(item(1, "Small", "Pink", 1));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_add_appends_on_different_variant_or_color() {
        let mut cart = Cart::new();
        cart.add(item(1, "Small", "Pink", 1));
        cart.add(item(1, "Large", "Pink", 1));
        cart.add(item(1, "Small", "Blue", 1));

        assert_eq!(cart.items().len(), 3);
    }

    #[test]
    fn test_add_clamps_zero_quantity() {
        let mut cart = Cart::new();
        cart.add(item(1, "", "", 0));
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_update_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add(item(1, "", "", 3));
        cart.update(ProductIndex::new(1), 0);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_update_missing_product_is_noop() {
        let mut cart = Cart::new();
        cart.add(item(1, "", "", 2));
        cart.update(ProductIndex::new(9), 5);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_remove_drops_all_variants() {
        let mut cart = Cart::new();
        cart.add(item(1, "Small", "Pink", 1));
        cart.add(item(1, "Large", "Blue", 2));
        cart.add(item(2, "", "", 1));

        cart.remove(ProductIndex::new(1));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product_id, ProductIndex::new(2));
    }

    #[test]
    fn test_total_and_count() {
        let mut cart = Cart::new();
        let mut first = item(1, "", "", 2);
        first.price = Price::parse("10.00").unwrap();
        let mut second = item(2, "", "", 1);
        second.price = Price::parse("2.50").unwrap();
        cart.add(first);
        cart.add(second);

        assert_eq!(cart.total().as_cents(), 2250);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total().as_cents(), 0);
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_session_serde_round_trip() {
        let mut cart = Cart::new();
        cart.add(item(1, "Small", "Pink", 2));
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
