//! Review repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use fondant_core::types::ReviewId;

use super::RepositoryError;
use crate::models::review::Review;

/// Raw database row for a review.
#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    name: String,
    email: String,
    rating: i64,
    comment: String,
    approved: bool,
    created_at: DateTime<Utc>,
}

impl ReviewRow {
    fn into_review(self) -> Result<Review, RepositoryError> {
        let rating = u8::try_from(self.rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "invalid review rating in database: {}",
                    self.rating
                ))
            })?;

        Ok(Review {
            id: ReviewId::new(self.id),
            name: self.name,
            email: self.email,
            rating,
            comment: self.comment,
            approved: self.approved,
            created_at: self.created_at,
        })
    }
}

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new review, unapproved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        rating: u8,
        comment: &str,
    ) -> Result<ReviewId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO reviews (name, email, rating, comment, approved, created_at)
             VALUES (?, ?, ?, ?, 0, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(i64::from(rating))
        .bind(comment)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(ReviewId::new(result.last_insert_rowid()))
    }

    /// List approved reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_approved(&self) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, name, email, rating, comment, approved, created_at
             FROM reviews
             WHERE approved = 1
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ReviewRow::into_review).collect()
    }
}
