//! Checkout identity and validation rules.
//!
//! Stripe is left unconfigured here, so a request that passes identity and
//! cart validation ends at 503. That boundary is exactly what these tests
//! pin down; the provider call itself is covered by unit tests on the
//! Stripe client.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, body_json};

#[tokio::test]
async fn checkout_requires_an_identity() {
    let mut app = TestApp::spawn(None).await;

    let response = app
        .post_json("/create-checkout-session", &json!({ "checkout_type": "cart" }))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Please login or create an account to complete your purchase"
    );
}

#[tokio::test]
async fn checkout_rejects_empty_cart() {
    let mut app = TestApp::spawn(None).await;
    app.register_user("maya@example.com").await;

    let response = app
        .post_json("/create-checkout-session", &json!({ "checkout_type": "cart" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Your cart is empty");
}

#[tokio::test]
async fn checkout_without_provider_keeps_the_cart() {
    let mut app = TestApp::spawn(None).await;
    app.register_user("maya@example.com").await;
    app.post_json("/cart/add", &json!({ "product_id": 0 })).await;

    let response = app
        .post_json("/create-checkout-session", &json!({ "checkout_type": "cart" }))
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Payment processing is not available. Please contact support."
    );

    // The cart is only cleared after a session is created.
    let response = app.get("/cart").await;
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn single_item_checkout_validates_the_price() {
    let mut app = TestApp::spawn(None).await;
    app.register_user("maya@example.com").await;

    let response = app
        .post_json(
            "/create-checkout-session",
            &json!({ "checkout_type": "single", "name": "Custom Topper", "price": "abc" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn identity_assertion_with_blank_subject_is_rejected() {
    let mut app = TestApp::spawn(None).await;

    let response = app
        .post_json(
            "/create-checkout-session",
            &json!({
                "checkout_type": "single",
                "name": "Custom Topper",
                "price": "30.00",
                "identity": {
                    "subject": "   ",
                    "email": "guest@example.com",
                    "display_name": "Guest Buyer",
                },
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn identity_assertion_with_bad_email_is_rejected() {
    let mut app = TestApp::spawn(None).await;

    let response = app
        .post_json(
            "/create-checkout-session",
            &json!({
                "checkout_type": "single",
                "name": "Custom Topper",
                "price": "30.00",
                "identity": {
                    "subject": "ext-123",
                    "email": "not-an-email",
                    "display_name": "Guest Buyer",
                },
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn identity_assertion_is_accepted_without_an_account() {
    let mut app = TestApp::spawn(None).await;

    // Identity resolves fine; the request then stops at the unconfigured
    // provider rather than at authentication.
    let response = app
        .post_json(
            "/create-checkout-session",
            &json!({
                "checkout_type": "single",
                "name": "Custom Topper",
                "price": "30.00",
                "identity": {
                    "subject": "ext-123",
                    "email": "guest@example.com",
                    "display_name": "Guest Buyer",
                },
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
