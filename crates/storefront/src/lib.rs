//! Fondant Booth storefront - public e-commerce site.
//!
//! # Architecture
//!
//! - Axum JSON API on port 5000
//! - Product catalog read from a JSON file on every request (edited by the
//!   `fondant-cli` catalog manager, not through this server)
//! - `SQLite` for users, orders, reviews, and session storage
//! - Stripe Checkout for payment, confirmed via webhook
//! - Session-held shopping cart (tower-sessions)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod stripe;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router, sessions included.
///
/// Sentry layers are added in `main`, not here, so tests can drive the
/// router without a Sentry client.
#[must_use]
pub fn build_app(state: AppState, session_store: tower_sessions_sqlx_store::SqliteStore) -> Router {
    let session_layer = middleware::create_session_layer(session_store, state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(
            middleware::enforce_session_lifetime,
        ))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
