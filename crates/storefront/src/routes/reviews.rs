//! Review route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::ReviewRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Minimum review text length.
const MIN_REVIEW_LENGTH: usize = 10;

/// `POST /api/submit-review` request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitReviewRequest {
    pub name: String,
    pub email: String,
    pub rating: u8,
    pub comment: String,
}

/// `POST /api/submit-review` - store a review pending approval.
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let name = request.name.trim();
    let email = request.email.trim();
    let comment = request.comment.trim();

    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_owned()));
    }
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".to_owned()));
    }
    if !(1..=5).contains(&request.rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 5".to_owned(),
        ));
    }
    // Character count, not bytes: multi-byte text must not get a pass.
    if comment.chars().count() < MIN_REVIEW_LENGTH {
        return Err(AppError::Validation(format!(
            "Review must be at least {MIN_REVIEW_LENGTH} characters"
        )));
    }

    let id = ReviewRepository::new(state.pool())
        .create(name, email, request.rating, comment)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "message": "Thank you for your review! It will be published after approval.",
        })),
    ))
}

/// `GET /reviews` - approved reviews, newest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<Value>> {
    let reviews = ReviewRepository::new(state.pool()).list_approved().await?;
    Ok(Json(json!({ "reviews": reviews })))
}
