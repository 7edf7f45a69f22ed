//! Database operations for the storefront `SQLite` database.
//!
//! Products live in a JSON file, not here. The database stores only:
//!
//! - `users` - Site accounts (argon2 password hashes)
//! - `orders` - Checkout sessions and their payment status
//! - `reviews` - Customer reviews awaiting approval
//! - `tower_sessions` - Session storage (managed by tower-sessions)
//!
//! Migrations are embedded from `crates/storefront/migrations/` and run on
//! startup.

use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePoolOptions;
use thiserror::Error;

pub mod orders;
pub mod reviews;
pub mod users;

pub use orders::OrderRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

/// Embedded database migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data failed to parse back into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Row not found where one was required.
    #[error("not found")]
    NotFound,

    /// Unique constraint violated (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The connection string should carry `?mode=rwc` so the database file is
/// created on first run.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

/// Returns true when a sqlx error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
