//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - DB readiness check
//!
//! # Catalog
//! GET  /products                - Product listing with derived ids
//! GET  /product/{id}            - Product detail (404 past end)
//!
//! # Cart (session-backed, JSON bodies)
//! GET  /cart                    - Cart contents + subtotal
//! POST /cart/add                - Add item (merges on product/variant/color)
//! POST /cart/update             - Set quantity (clamped to >= 1)
//! POST /cart/remove             - Remove all lines for a product
//! GET  /cart/count              - {"count": n}
//!
//! # Checkout & orders
//! POST /create-checkout-session - Start Stripe checkout (cart or single item)
//! POST /webhook                 - Stripe event callback (raw body)
//! GET  /order/{id}              - Order detail (capability token or session)
//! GET  /api/order-status/{id}   - Order status poll (same access rules)
//! GET  /order-success           - Post-payment landing
//! GET  /cancel                  - Cancelled-payment landing
//!
//! # Reviews & pages
//! POST /api/submit-review       - Submit a review (pending approval)
//! GET  /reviews                 - Approved reviews
//! GET  /qa                      - FAQ
//! POST /contact                 - Contact form (SMTP)
//!
//! # Auth
//! POST /register                - Create account + login
//! POST /login                   - Login
//! GET  /logout                  - Logout (clears session)
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod orders;
pub mod pages;
pub mod products;
pub mod reviews;
pub mod webhook;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/products", get(products::index))
        .route("/product/{id}", get(products::show))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout and webhook
        .route("/create-checkout-session", post(checkout::create_session))
        .route("/webhook", post(webhook::receive))
        // Orders
        .route("/order/{id}", get(orders::show))
        .route("/api/order-status/{id}", get(orders::status))
        .route("/order-success", get(pages::order_success))
        .route("/cancel", get(pages::cancel))
        // Reviews
        .route("/api/submit-review", post(reviews::submit))
        .route("/reviews", get(reviews::index))
        // Informational pages
        .route("/qa", get(pages::qa))
        .route("/contact", post(contact::submit))
        // Auth
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
}
