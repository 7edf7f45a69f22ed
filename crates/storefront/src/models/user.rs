//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fondant_core::types::{Email, UserId};

/// A registered site account.
///
/// The password hash is never part of this type; it stays inside the
/// repository and the auth service.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display name shown in the UI and attached to orders.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
