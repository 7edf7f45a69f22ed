//! Status enums for orders.

use serde::{Deserialize, Serialize};

/// Payment status of an order.
///
/// Orders are created `Pending` when a checkout session is opened and move
/// to `Completed` exactly once, driven by the payment provider's webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Checkout session created, payment not yet confirmed.
    #[default]
    Pending,
    /// Payment confirmed by the provider.
    Completed,
}

impl OrderStatus {
    /// Database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for status in [OrderStatus::Pending, OrderStatus::Completed] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_rejects_unknown() {
        assert!("refunded".parse::<OrderStatus>().is_err());
    }
}
