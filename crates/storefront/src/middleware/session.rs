//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. The session holds
//! the logged-in user and the shopping cart.
//!
//! Sessions have a fixed absolute lifetime: each session is stamped with
//! its start time on first use, and [`enforce_session_lifetime`] flushes
//! any session older than 24 hours regardless of activity. The store-side
//! inactivity expiry only purges abandoned sessions; it never extends a
//! session past the absolute deadline.

use axum::{extract::Request, middleware::Next, response::Response};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fondant_session";

/// Absolute session lifetime in seconds (24 hours).
const SESSION_LIFETIME_SECONDS: i64 = 24 * 60 * 60;

/// Session key holding the session's start timestamp.
const SESSION_STARTED_AT_KEY: &str = "session_started_at";

/// Create the session store backed by the main database.
///
/// The caller must run `store.migrate()` before serving requests.
#[must_use]
pub fn create_session_store(pool: &SqlitePool) -> SqliteStore {
    SqliteStore::new(pool.clone())
}

/// Create the session layer.
///
/// The cookie is HTTP-only and `SameSite=Lax`; `Secure` is set only when
/// the public base URL is HTTPS so local development still works.
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &StorefrontConfig,
) -> SessionManagerLayer<SqliteStore> {
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_LIFETIME_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Enforce the absolute session lifetime.
///
/// Must run inside the session layer. Store failures are logged and the
/// request proceeds; the session simply stays untracked for this request.
pub async fn enforce_session_lifetime(
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    if let Err(err) = expire_stale_session(&session, Utc::now()).await {
        tracing::error!(error = %err, "Failed to enforce session lifetime");
    }
    next.run(request).await
}

/// Stamp a fresh session with its start time; flush and restamp one whose
/// lifetime has run out. The flush drops the user and cart and rotates the
/// session ID on the next save.
async fn expire_stale_session(
    session: &Session,
    now: DateTime<Utc>,
) -> Result<(), tower_sessions::session::Error> {
    match session
        .get::<DateTime<Utc>>(SESSION_STARTED_AT_KEY)
        .await?
    {
        Some(started_at) if lifetime_exceeded(started_at, now) => {
            tracing::debug!(%started_at, "Session lifetime exceeded, flushing");
            session.flush().await?;
            session.insert(SESSION_STARTED_AT_KEY, now).await?;
        }
        Some(_) => {}
        None => session.insert(SESSION_STARTED_AT_KEY, now).await?,
    }
    Ok(())
}

fn lifetime_exceeded(started_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(started_at).num_seconds() >= SESSION_LIFETIME_SECONDS
}
