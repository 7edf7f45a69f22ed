//! Contact form route handler.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::services::email::ContactMessage;
use crate::state::AppState;

/// `POST /contact` request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// `POST /contact` - forward a message to the shop owner over SMTP.
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<Value>> {
    let name = request.name.trim();
    let email = request.email.trim();
    let message = request.message.trim();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(AppError::Validation("All fields are required".to_owned()));
    }

    let Some(service) = state.email() else {
        tracing::warn!("Contact form submitted but SMTP is not configured");
        return Err(AppError::Email("SMTP not configured".to_owned()));
    };

    service
        .send_contact_message(&ContactMessage {
            name,
            email,
            message,
        })
        .await
        .map_err(|e| AppError::Email(e.to_string()))?;

    Ok(Json(json!({
        "message": "Thank you for your message! We will get back to you soon.",
    })))
}
