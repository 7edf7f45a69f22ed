//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::session::CurrentUser;
use crate::models::user::User;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

/// `POST /register` request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// `POST /login` request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn user_response(user: &User) -> Value {
    json!({
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.full_name(),
        }
    })
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
        name: user.full_name(),
    };
    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))
}

/// `POST /register` - create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let user = AuthService::new(state.pool())
        .register(Registration {
            first_name: &request.first_name,
            last_name: &request.last_name,
            email: &request.email,
            password: &request.password,
            confirm_password: &request.confirm_password,
        })
        .await?;

    start_session(&session, &user).await?;
    Ok((StatusCode::CREATED, Json(user_response(&user))))
}

/// `POST /login` - authenticate and start a session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let user = AuthService::new(state.pool())
        .login(&request.email, &request.password)
        .await?;

    start_session(&session, &user).await?;
    Ok(Json(user_response(&user)))
}

/// `GET /logout` - clear the logged-in user.
///
/// The cart stays: logging out should not empty a shopper's basket.
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(Json(json!({ "message": "You have been logged out successfully." })))
}
