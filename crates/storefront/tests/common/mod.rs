//! Shared harness for storefront integration tests.
//!
//! Each test gets its own in-memory `SQLite` database and a temp catalog
//! file; requests are driven straight through the router, no network.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;
use tower_sessions_sqlx_store::SqliteStore;

use fondant_core::types::{Price, UserId};
use fondant_storefront::build_app;
use fondant_storefront::config::{StorefrontConfig, StripeConfig};
use fondant_storefront::db::MIGRATOR;
use fondant_storefront::db::orders::{NewOrder, OrderRepository};
use fondant_storefront::state::AppState;

/// Deterministic secret so tests can derive capability tokens themselves.
pub const SESSION_SECRET: &str = "integration-test-session-secret-0001";

const CATALOG: &str = r#"[
    {"title": "Unicorn Topper", "price": "24.99", "link": "https://example.com/unicorn", "image_url": "https://example.com/unicorn.jpg"},
    {"title": "Dino Topper", "price": "19.99", "link": "https://example.com/dino", "image_url": "https://example.com/dino.jpg"}
]"#;

/// An app instance with its own database, catalog file, and cookie jar.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    cookie: Option<String>,
    catalog_file: tempfile::NamedTempFile,
}

impl TestApp {
    /// Build an app against a fresh in-memory database.
    ///
    /// `webhook_secret` selects the webhook verification mode: `None` runs
    /// the webhook unverified, `Some` requires a valid `Stripe-Signature`.
    pub async fn spawn(webhook_secret: Option<&str>) -> Self {
        let catalog_file = tempfile::NamedTempFile::new().expect("create catalog file");
        std::fs::write(catalog_file.path(), CATALOG).expect("write catalog");

        // One connection so every query sees the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("connect to in-memory database");
        MIGRATOR.run(&pool).await.expect("run migrations");

        let session_store = SqliteStore::new(pool.clone());
        session_store
            .migrate()
            .await
            .expect("create session table");

        let config = StorefrontConfig {
            database_url: "sqlite::memory:".to_owned(),
            host: "127.0.0.1".parse().expect("parse host"),
            port: 0,
            base_url: "http://localhost:5000".to_owned(),
            session_secret: SecretString::from(SESSION_SECRET),
            products_file: catalog_file.path().to_path_buf(),
            stripe: StripeConfig {
                secret_key: None,
                publishable_key: "pk_test_default".to_owned(),
                webhook_secret: webhook_secret.map(SecretString::from),
            },
            email: None,
            sentry_dsn: None,
        };

        let state = AppState::new(config, pool.clone());
        let router = build_app(state, session_store);

        Self {
            router,
            pool,
            cookie: None,
            catalog_file,
        }
    }

    /// Send a request, replaying and capturing the session cookie.
    pub async fn request(&mut self, mut request: Request<Body>) -> Response<Body> {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().expect("cookie header"));
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("route request");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let raw = set_cookie.to_str().expect("set-cookie value");
            let pair = raw.split(';').next().unwrap_or(raw);
            self.cookie = Some(pair.to_owned());
        }
        response
    }

    pub async fn get(&mut self, path: &str) -> Response<Body> {
        self.request(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("build GET request"),
        )
        .await
    }

    pub async fn post_json(&mut self, path: &str, body: &Value) -> Response<Body> {
        self.request(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(body).expect("encode body")))
                .expect("build POST request"),
        )
        .await
    }

    /// POST a raw webhook payload, optionally signed.
    pub async fn post_webhook(&mut self, payload: &str, signature: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(signature) = signature {
            builder = builder.header("Stripe-Signature", signature);
        }
        self.request(
            builder
                .body(Body::from(payload.to_owned()))
                .expect("build webhook request"),
        )
        .await
    }

    /// Drop the session cookie, simulating a different browser.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    pub fn has_session_cookie(&self) -> bool {
        self.cookie
            .as_deref()
            .is_some_and(|cookie| cookie.starts_with("fondant_session="))
    }

    /// Overwrite the catalog file; the storefront re-reads it per request.
    pub fn rewrite_catalog(&self, contents: &str) {
        std::fs::write(self.catalog_file.path(), contents).expect("rewrite catalog");
    }

    /// Register an account through the API and return its user id.
    pub async fn register_user(&mut self, email: &str) -> i64 {
        let response = self
            .post_json(
                "/register",
                &serde_json::json!({
                    "first_name": "Maya",
                    "last_name": "Baker",
                    "email": email,
                    "password": "sugarcraft",
                    "confirm_password": "sugarcraft",
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        body["user"]["id"].as_i64().expect("user id")
    }

    /// Insert a pending order directly, the way a checkout would.
    pub async fn insert_pending_order(
        &self,
        user_id: Option<i64>,
        summary: &str,
        total: &str,
        stripe_session_id: &str,
    ) -> i64 {
        let mut conn = self.pool.acquire().await.expect("acquire connection");
        let order_id = OrderRepository::insert_pending(
            &mut conn,
            &NewOrder {
                user_id: user_id.map(UserId::new),
                product_name: summary.to_owned(),
                product_price: Price::parse(total).expect("parse total"),
            },
        )
        .await
        .expect("insert order");
        OrderRepository::attach_session_id(&mut conn, order_id, stripe_session_id)
            .await
            .expect("attach session id");
        order_id.as_i64()
    }

    /// Read an order's status column straight from the database.
    pub async fn order_status(&self, id: i64) -> String {
        let (status,): (String,) = sqlx::query_as("SELECT status FROM orders WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .expect("fetch order status");
        status
    }
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response JSON")
}
