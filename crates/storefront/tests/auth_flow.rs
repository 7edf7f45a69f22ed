//! Registration, login, and logout through the full router.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, body_json};

fn registration(email: &str) -> serde_json::Value {
    json!({
        "first_name": "Maya",
        "last_name": "Baker",
        "email": email,
        "password": "sugarcraft",
        "confirm_password": "sugarcraft",
    })
}

#[tokio::test]
async fn register_creates_account_and_session() {
    let mut app = TestApp::spawn(None).await;

    let response = app
        .post_json("/register", &registration("maya@example.com"))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(app.has_session_cookie());

    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "maya@example.com");
    assert_eq!(body["user"]["name"], "Maya Baker");
    assert!(body["user"]["id"].is_i64());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let mut app = TestApp::spawn(None).await;
    app.register_user("maya@example.com").await;
    app.clear_cookies();

    let response = app
        .post_json("/register", &registration("maya@example.com"))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Email already registered. Please log in.");
}

#[tokio::test]
async fn register_rejects_password_mismatch() {
    let mut app = TestApp::spawn(None).await;

    let mut request = registration("maya@example.com");
    request["confirm_password"] = json!("different");
    let response = app.post_json("/register", &request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Passwords do not match");
}

#[tokio::test]
async fn register_rejects_short_password() {
    let mut app = TestApp::spawn(None).await;

    let mut request = registration("maya@example.com");
    request["password"] = json!("abc");
    request["confirm_password"] = json!("abc");
    let response = app.post_json("/register", &request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn register_rejects_blank_fields() {
    let mut app = TestApp::spawn(None).await;

    let mut request = registration("maya@example.com");
    request["first_name"] = json!("");
    let response = app.post_json("/register", &request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "All fields are required");
}

#[tokio::test]
async fn login_succeeds_with_correct_password() {
    let mut app = TestApp::spawn(None).await;
    app.register_user("maya@example.com").await;
    app.clear_cookies();

    let response = app
        .post_json(
            "/login",
            &json!({ "email": "maya@example.com", "password": "sugarcraft" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.has_session_cookie());
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "maya@example.com");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let mut app = TestApp::spawn(None).await;
    app.register_user("maya@example.com").await;
    app.clear_cookies();

    let response = app
        .post_json(
            "/login",
            &json!({ "email": "maya@example.com", "password": "wrong-password" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid email or password.");
}

#[tokio::test]
async fn login_unknown_email_gets_the_same_error() {
    let mut app = TestApp::spawn(None).await;

    let response = app
        .post_json(
            "/login",
            &json!({ "email": "nobody@example.com", "password": "sugarcraft" }),
        )
        .await;

    // Indistinguishable from a wrong password.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid email or password.");
}

#[tokio::test]
async fn logout_clears_user_but_keeps_cart() {
    let mut app = TestApp::spawn(None).await;
    app.register_user("maya@example.com").await;

    let response = app
        .post_json("/cart/add", &json!({ "product_id": 0 }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/logout").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "You have been logged out successfully.");

    // The cart survives the logout...
    let response = app.get("/cart").await;
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);

    // ...but checkout now demands an identity again.
    let response = app
        .post_json("/create-checkout-session", &json!({ "checkout_type": "cart" }))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
