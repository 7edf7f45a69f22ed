//! Domain models for the storefront.

pub mod order;
pub mod review;
pub mod session;
pub mod user;
