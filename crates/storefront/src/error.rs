//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`.
//!
//! External-dependency failures surface a generic "contact support" message;
//! the details stay in the server log and Sentry only.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::stripe::StripeError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Bad user input; recovered in place with a message.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Registration attempted with an email that already has an account.
    #[error("Duplicate email")]
    DuplicateEmail,

    /// Login failed; never says which part was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Checkout attempted without a caller identity.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Payment provider credentials are not configured.
    #[error("Payment provider unavailable")]
    PaymentProviderUnavailable,

    /// Payment provider rejected the request.
    #[error("Payment provider error: {0}")]
    PaymentProvider(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Token/session mismatch on an order view.
    #[error("Access denied")]
    AccessDenied,

    /// Outbound email is not configured or failed to send.
    #[error("Email delivery failed: {0}")]
    Email(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => Self::Validation(msg),
            AuthError::EmailTaken => Self::DuplicateEmail,
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Repository(e) => Self::Database(e),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_owned()),
        }
    }
}

impl From<StripeError> for AppError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::NotConfigured => Self::PaymentProviderUnavailable,
            other => Self::PaymentProvider(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side and provider errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::PaymentProvider(_) | Self::Email(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::PaymentProviderUnavailable | Self::Email(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::PaymentProvider(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AccessDenied => StatusCode::FORBIDDEN,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Validation(msg) => msg.clone(),
            Self::DuplicateEmail => "Email already registered. Please log in.".to_owned(),
            Self::InvalidCredentials => "Invalid email or password.".to_owned(),
            Self::AuthenticationRequired => {
                "Please login or create an account to complete your purchase".to_owned()
            }
            Self::PaymentProviderUnavailable | Self::PaymentProvider(_) => {
                "Payment processing is not available. Please contact support.".to_owned()
            }
            Self::Email(_) => {
                "Sorry, there was an error sending your message. Please try again.".to_owned()
            }
            Self::NotFound(what) => format!("{what} not found"),
            Self::AccessDenied => "Access denied. Please log in to view this order.".to_owned(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
