//! Order repository for database operations.
//!
//! Orders follow a strict lifecycle: inserted `pending` inside the checkout
//! transaction, session ID attached before commit, then flipped to
//! `completed` exactly once by the payment webhook. The completion update is
//! guarded on `status = 'pending'` so replayed webhooks are no-ops.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use fondant_core::types::{OrderId, OrderStatus, Price, UserId};

use super::RepositoryError;
use crate::models::order::Order;

/// Fields for a new pending order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<UserId>,
    /// Item summary shown on the order.
    pub product_name: String,
    /// Order total in dollars.
    pub product_price: Price,
}

/// Outcome of a webhook-driven completion attempt.
#[derive(Debug)]
pub enum CompletionOutcome {
    /// The order moved from pending to completed.
    Completed(Order),
    /// The order was already completed (duplicate webhook delivery).
    AlreadyCompleted,
    /// No order carries this checkout session ID.
    NotFound,
}

/// Raw database row for an order.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: Option<i64>,
    product_name: String,
    product_price: String,
    stripe_session_id: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let product_price = Price::parse(&self.product_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order price in database: {e}"))
        })?;
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: self.user_id.map(UserId::new),
            product_name: self.product_name,
            product_price,
            stripe_session_id: self.stripe_session_id,
            status,
            created_at: self.created_at,
        })
    }
}

const SELECT_ORDER: &str = "SELECT id, user_id, product_name, product_price,
                                   stripe_session_id, status, created_at
                            FROM orders";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a pending order inside an open checkout transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_pending(
        conn: &mut SqliteConnection,
        new: &NewOrder,
    ) -> Result<OrderId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO orders (user_id, product_name, product_price, status, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new.user_id)
        .bind(&new.product_name)
        .bind(new.product_price.to_string())
        .bind(OrderStatus::Pending.as_str())
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(OrderId::new(result.last_insert_rowid()))
    }

    /// Attach the provider's checkout session ID to a pending order, inside
    /// the same transaction that inserted it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn attach_session_id(
        conn: &mut SqliteConnection,
        id: OrderId,
        session_id: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE orders SET stripe_session_id = ? WHERE id = ?")
            .bind(session_id)
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Get an order by its provider checkout session ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_session_id(
        &self,
        session_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row =
            sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE stripe_session_id = ?"))
                .bind(session_id)
                .fetch_optional(self.pool)
                .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Mark the order for a checkout session completed, exactly once.
    ///
    /// The update is guarded on `status = 'pending'`: a session that has
    /// already completed reports `AlreadyCompleted` instead of updating
    /// again, so duplicate webhook deliveries are harmless.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn mark_completed(
        &self,
        session_id: &str,
    ) -> Result<CompletionOutcome, RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET status = ?
             WHERE stripe_session_id = ? AND status = ?",
        )
        .bind(OrderStatus::Completed.as_str())
        .bind(session_id)
        .bind(OrderStatus::Pending.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() > 0 {
            // Just updated, so the row exists.
            let order = self
                .get_by_session_id(session_id)
                .await?
                .ok_or(RepositoryError::NotFound)?;
            return Ok(CompletionOutcome::Completed(order));
        }

        match self.get_by_session_id(session_id).await? {
            Some(_) => Ok(CompletionOutcome::AlreadyCompleted),
            None => Ok(CompletionOutcome::NotFound),
        }
    }
}
