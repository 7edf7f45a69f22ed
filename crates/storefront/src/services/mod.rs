//! Business logic services.

pub mod auth;
pub mod checkout;
pub mod email;
pub mod order_token;
