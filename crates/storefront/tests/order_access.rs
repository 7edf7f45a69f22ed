//! Order visibility rules: session ownership and capability tokens.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use secrecy::SecretString;
use serde_json::json;

use fondant_core::types::{OrderId, UserId};
use fondant_storefront::services::order_token;

use common::{SESSION_SECRET, TestApp, body_json};

fn token_for(order_id: i64, user_id: i64) -> String {
    order_token::generate(
        OrderId::new(order_id),
        UserId::new(user_id),
        &SecretString::from(SESSION_SECRET),
    )
}

#[tokio::test]
async fn owner_session_can_view_the_order() {
    let mut app = TestApp::spawn(None).await;
    let user_id = app.register_user("maya@example.com").await;
    let order_id = app
        .insert_pending_order(Some(user_id), "Unicorn Topper (x1)", "24.99", "cs_test_1")
        .await;

    let response = app.get(&format!("/order/{order_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["order"]["id"], order_id);
    assert_eq!(body["order"]["product_name"], "Unicorn Topper (x1)");
    assert_eq!(body["order"]["product_price"], "24.99");
    assert_eq!(body["order"]["status"], "pending");
}

#[tokio::test]
async fn strangers_are_denied_without_confirming_contents() {
    let mut app = TestApp::spawn(None).await;
    let user_id = app.register_user("maya@example.com").await;
    let order_id = app
        .insert_pending_order(Some(user_id), "Unicorn Topper (x1)", "24.99", "cs_test_1")
        .await;
    app.clear_cookies();

    let response = app.get(&format!("/order/{order_id}")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Access denied. Please log in to view this order.");
}

#[tokio::test]
async fn a_different_user_cannot_view_someone_elses_order() {
    let mut app = TestApp::spawn(None).await;
    let owner_id = app.register_user("maya@example.com").await;
    let order_id = app
        .insert_pending_order(Some(owner_id), "Unicorn Topper (x1)", "24.99", "cs_test_1")
        .await;

    app.clear_cookies();
    app.register_user("intruder@example.com").await;

    let response = app.get(&format!("/order/{order_id}")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn capability_token_grants_access_without_a_session() {
    let mut app = TestApp::spawn(None).await;
    let user_id = app.register_user("maya@example.com").await;
    let order_id = app
        .insert_pending_order(Some(user_id), "Unicorn Topper (x1)", "24.99", "cs_test_1")
        .await;
    app.clear_cookies();

    let token = token_for(order_id, user_id);
    let response = app.get(&format!("/order/{order_id}?token={token}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_token_is_denied() {
    let mut app = TestApp::spawn(None).await;
    let user_id = app.register_user("maya@example.com").await;
    let order_id = app
        .insert_pending_order(Some(user_id), "Unicorn Topper (x1)", "24.99", "cs_test_1")
        .await;
    app.clear_cookies();

    let response = app
        .get(&format!("/order/{order_id}?token=0123456789abcdef"))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_order_is_a_404() {
    let mut app = TestApp::spawn(None).await;

    let response = app.get("/order/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Order not found");
}

#[tokio::test]
async fn guest_orders_have_no_capability_token() {
    let mut app = TestApp::spawn(None).await;
    let order_id = app
        .insert_pending_order(None, "Custom Topper (x1)", "30.00", "cs_test_guest")
        .await;

    // No user row to derive a token for, so every token fails.
    let token = token_for(order_id, 1);
    let response = app.get(&format!("/order/{order_id}?token={token}")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn status_poll_reflects_webhook_completion() {
    let mut app = TestApp::spawn(None).await;
    let user_id = app.register_user("maya@example.com").await;
    let order_id = app
        .insert_pending_order(Some(user_id), "Unicorn Topper (x1)", "24.99", "cs_test_1")
        .await;

    let response = app.get(&format!("/api/order-status/{order_id}")).await;
    let body = body_json(response).await;
    assert_eq!(body["status"], "pending");

    let payload = json!({
        "type": "checkout.session.completed",
        "data": { "object": { "id": "cs_test_1" } },
    })
    .to_string();
    let response = app.post_webhook(&payload, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get(&format!("/api/order-status/{order_id}")).await;
    let body = body_json(response).await;
    assert_eq!(body["order_id"], order_id);
    assert_eq!(body["status"], "completed");
}

#[tokio::test]
async fn order_success_landing_returns_token_for_account_orders() {
    let mut app = TestApp::spawn(None).await;
    let user_id = app.register_user("maya@example.com").await;
    let order_id = app
        .insert_pending_order(Some(user_id), "Unicorn Topper (x1)", "24.99", "cs_test_1")
        .await;
    app.clear_cookies();

    let response = app.get("/order-success?session_id=cs_test_1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["order_id"], order_id);
    assert_eq!(body["token"], token_for(order_id, user_id).as_str());
}

#[tokio::test]
async fn order_success_landing_is_generic_for_unknown_sessions() {
    let mut app = TestApp::spawn(None).await;

    let response = app.get("/order-success?session_id=cs_unknown").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Payment successful! Thank you for your purchase."
    );
    assert!(body.get("order_id").is_none());
}

#[tokio::test]
async fn cancel_landing() {
    let mut app = TestApp::spawn(None).await;

    let response = app.get("/cancel").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Payment cancelled. Please try again when ready.");
}
