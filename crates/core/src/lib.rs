//! Fondant Booth Core - Shared types library.
//!
//! This crate provides common types used across all Fondant Booth components:
//! - `storefront` - Public-facing shop (catalog, cart, checkout, orders)
//! - `cli` - Command-line catalog manager
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`cart`] - Session cart model with line merging and totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartItem};
pub use types::*;
