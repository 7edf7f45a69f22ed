//! Checkout route handler.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use fondant_core::cart::CartItem;
use fondant_core::types::{Email, Price, ProductIndex};

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::services::checkout::{CheckoutIdentity, CheckoutService};
use crate::state::AppState;

use super::cart::{load_cart, save_cart};

/// `POST /create-checkout-session` request body.
///
/// Unknown fields cannot be rejected here: the tagged mode enum is
/// flattened in, which is incompatible with serde's strict mode.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(flatten)]
    pub mode: CheckoutMode,
    /// Identity assertion for callers without a login session.
    #[serde(default)]
    pub identity: Option<IdentityAssertion>,
}

/// Cart checkout or single-item buy-now.
#[derive(Debug, Deserialize)]
#[serde(tag = "checkout_type", rename_all = "snake_case")]
pub enum CheckoutMode {
    /// Check out the whole session cart.
    Cart,
    /// Check out one item directly, bypassing the cart.
    Single {
        name: String,
        /// Decimal price string.
        price: String,
    },
}

/// An externally-asserted caller identity.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityAssertion {
    pub subject: String,
    pub email: String,
    pub display_name: String,
}

/// `POST /create-checkout-session` - start a Stripe checkout.
///
/// The caller must be identified before any provider call: either a
/// logged-in session user or an explicit identity assertion in the body.
/// A successful cart checkout clears the session cart.
pub async fn create_session(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    session: Session,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<Value>> {
    let identity = resolve_identity(&state, current_user, request.identity).await?;

    let (items, from_cart) = match request.mode {
        CheckoutMode::Cart => {
            let cart = load_cart(&session).await;
            (cart.items().to_vec(), true)
        }
        CheckoutMode::Single { name, price } => {
            let price = Price::parse(&price)
                .map_err(|e| AppError::Validation(format!("Invalid price: {e}")))?;
            let item = CartItem {
                product_id: ProductIndex::new(0),
                name,
                price,
                quantity: 1,
                variant: String::new(),
                color: String::new(),
                image: String::new(),
            };
            (vec![item], false)
        }
    };

    let service = CheckoutService::new(state.pool(), state.stripe(), &state.config().base_url);
    let started = service.begin(&items, &identity).await?;

    if from_cart {
        save_cart(&session, &fondant_core::cart::Cart::new()).await?;
    }

    Ok(Json(json!({ "url": started.url, "order_id": started.order_id })))
}

/// Resolve the paying identity: session user first, then the request-body
/// assertion. Asserted emails are looked up so orders from account holders
/// still link to their user row.
async fn resolve_identity(
    state: &AppState,
    current_user: Option<crate::models::session::CurrentUser>,
    assertion: Option<IdentityAssertion>,
) -> Result<CheckoutIdentity> {
    if let Some(user) = current_user {
        return Ok(CheckoutIdentity {
            user_id: Some(user.id),
            subject: user.id.to_string(),
            email: user.email,
            name: user.name,
        });
    }

    let Some(assertion) = assertion else {
        return Err(AppError::AuthenticationRequired);
    };
    if assertion.subject.trim().is_empty() {
        return Err(AppError::AuthenticationRequired);
    }

    let email = Email::parse(&assertion.email)
        .map_err(|e| AppError::Validation(format!("Invalid email address: {e}")))?;

    let user_id = UserRepository::new(state.pool())
        .get_by_email(&email)
        .await?
        .map(|user| user.id);

    Ok(CheckoutIdentity {
        user_id,
        subject: assertion.subject,
        email,
        name: assertion.display_name,
    })
}
