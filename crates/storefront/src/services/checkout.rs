//! Checkout orchestration.
//!
//! Turns a set of cart lines into a Stripe checkout session. The pending
//! order row is written and the provider session ID attached inside one
//! transaction, so an order either exists with its session ID or not at
//! all; there is no window where a paid session has no matching row.

use fondant_core::cart::CartItem;
use fondant_core::types::{Email, OrderId, Price, UserId};
use sqlx::SqlitePool;

use crate::db::orders::{NewOrder, OrderRepository};
use crate::error::{AppError, Result};
use crate::stripe::{CheckoutLineItem, CheckoutSessionParams, StripeClient};

/// Number of item names spelled out in the order summary.
const SUMMARY_ITEM_LIMIT: usize = 3;

/// Who is paying.
///
/// Checkout never runs anonymously: the caller is either a logged-in user
/// (resolved from the session) or presents an explicit identity assertion
/// in the request body.
#[derive(Debug, Clone)]
pub struct CheckoutIdentity {
    /// Local account ID, when the email maps to one.
    pub user_id: Option<UserId>,
    /// Stable subject identifier: the local user ID, or the asserted
    /// subject string for identities without a local account.
    pub subject: String,
    pub email: Email,
    pub name: String,
}

/// A successfully started checkout.
#[derive(Debug)]
pub struct CheckoutStarted {
    pub order_id: OrderId,
    /// Provider session ID (`cs_...`), persisted on the order row.
    pub session_id: String,
    /// Hosted payment page to redirect the customer to.
    pub url: String,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a SqlitePool,
    stripe: &'a StripeClient,
    base_url: &'a str,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, stripe: &'a StripeClient, base_url: &'a str) -> Self {
        Self {
            pool,
            stripe,
            base_url,
        }
    }

    /// Create a pending order and a Stripe checkout session for it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an empty item list,
    /// `AppError::PaymentProviderUnavailable` when Stripe is not configured,
    /// and `AppError::PaymentProvider` when Stripe rejects the session.
    pub async fn begin(
        &self,
        items: &[CartItem],
        identity: &CheckoutIdentity,
    ) -> Result<CheckoutStarted> {
        if items.is_empty() {
            return Err(AppError::Validation("Your cart is empty".to_owned()));
        }
        if !self.stripe.is_configured() {
            return Err(AppError::PaymentProviderUnavailable);
        }

        let order_name = summarize_items(items);
        let total = items
            .iter()
            .map(CartItem::line_total)
            .fold(Price::default(), |acc, line| acc.plus(line));

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(crate::db::RepositoryError::from)?;

        let order_id = OrderRepository::insert_pending(
            &mut *tx,
            &NewOrder {
                user_id: identity.user_id,
                product_name: order_name.clone(),
                product_price: total,
            },
        )
        .await?;

        let params = build_session_params(items, identity, order_id, &order_name, self.base_url);

        let session = self.stripe.create_checkout_session(&params).await?;

        OrderRepository::attach_session_id(&mut *tx, order_id, &session.id).await?;
        tx.commit().await.map_err(crate::db::RepositoryError::from)?;

        tracing::info!(
            order_id = %order_id,
            session_id = %session.id,
            "Checkout session created"
        );

        Ok(CheckoutStarted {
            order_id,
            session_id: session.id,
            url: session.url,
        })
    }
}

/// Assemble the provider request: one line item per cart line, order
/// metadata echoed back in the webhook, and the redirect URLs.
fn build_session_params(
    items: &[CartItem],
    identity: &CheckoutIdentity,
    order_id: OrderId,
    order_name: &str,
    base_url: &str,
) -> CheckoutSessionParams {
    CheckoutSessionParams {
        line_items: items.iter().map(to_line_item).collect(),
        metadata: vec![
            ("order_id".to_owned(), order_id.to_string()),
            ("user_id".to_owned(), identity.subject.clone()),
            ("user_email".to_owned(), identity.email.as_str().to_owned()),
            ("user_name".to_owned(), identity.name.clone()),
            ("order_name".to_owned(), order_name.to_owned()),
        ],
        success_url: format!("{base_url}/order-success?session_id={{CHECKOUT_SESSION_ID}}"),
        cancel_url: format!("{base_url}/cancel"),
        customer_email: Some(identity.email.as_str().to_owned()),
    }
}

/// Build the Stripe line item for a cart line.
///
/// Variant and color are folded into the display name, e.g.
/// `"Unicorn Topper - Large Pink"`.
fn to_line_item(item: &CartItem) -> CheckoutLineItem {
    let options = format!("{} {}", item.variant, item.color);
    let options = options.trim();
    let name = if options.is_empty() {
        item.name.clone()
    } else {
        format!("{} - {options}", item.name)
    };

    CheckoutLineItem {
        name,
        unit_amount_cents: item.price.as_cents(),
        quantity: item.quantity,
    }
}

/// Human-readable order summary: the first few item names with quantities,
/// then a count of the rest.
fn summarize_items(items: &[CartItem]) -> String {
    let names: Vec<String> = items
        .iter()
        .take(SUMMARY_ITEM_LIMIT)
        .map(|item| format!("{} (x{})", item.name, item.quantity))
        .collect();
    let mut summary = names.join(", ");
    if items.len() > SUMMARY_ITEM_LIMIT {
        let remaining = items.len() - SUMMARY_ITEM_LIMIT;
        summary.push_str(&format!(" and {remaining} more"));
    }
    summary
}
