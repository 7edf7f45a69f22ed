//! Order model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fondant_core::types::{OrderId, OrderStatus, Price, UserId};

/// A checkout session and its payment status.
///
/// Rows are created `pending` before the customer is redirected to the
/// payment provider and flipped to `completed` exactly once by the webhook.
/// `user_id` is null for orders placed with an asserted identity that has
/// no local account.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    /// Human-readable item summary ("Unicorn Topper (x2), Dino Topper (x1)").
    pub product_name: String,
    /// Order total in dollars.
    pub product_price: Price,
    /// Provider checkout session ID, filled in during checkout.
    pub stripe_session_id: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
