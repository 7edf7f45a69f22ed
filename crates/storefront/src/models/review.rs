//! Customer review model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fondant_core::types::ReviewId;

/// A customer review.
///
/// Submitted reviews start unapproved and only show on the site once the
/// owner approves them out-of-band.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub name: String,
    /// Submitter's email; kept for the owner, never served publicly.
    #[serde(skip)]
    pub email: String,
    pub rating: u8,
    pub comment: String,
    #[serde(skip)]
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}
