//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use fondant_core::types::{Email, UserId};

use super::RepositoryError;
use crate::models::user::User;

/// Raw database row for a user.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            email,
            created_at: self.created_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, first_name, last_name, email, created_at
             FROM users WHERE email = ?",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user with an argon2 password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (first_name, last_name, email, password_hash, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(created_at)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if super::is_unique_violation(&e) {
                RepositoryError::Conflict(format!("email already registered: {}", email.as_str()))
            } else {
                RepositoryError::Database(e)
            }
        })?;

        Ok(User {
            id: UserId::new(result.last_insert_rowid()),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email: email.clone(),
            created_at,
        })
    }

    /// Get the stored password hash for an email, if the account exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<String>, RepositoryError> {
        let hash: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM users WHERE email = ?")
                .bind(email.as_str())
                .fetch_optional(self.pool)
                .await?;

        Ok(hash.map(|(h,)| h))
    }
}
