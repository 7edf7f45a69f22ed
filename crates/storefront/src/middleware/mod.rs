//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `SQLite` store)
//! 4. Session lifetime enforcement (absolute 24 h cap)

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, clear_current_user, set_current_user};
pub use session::{create_session_layer, create_session_store, enforce_session_lifetime};
