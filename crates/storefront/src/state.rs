//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::email::EmailService;
use crate::stripe::{StripeClient, WebhookMode};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: SqlitePool,
    catalog: Catalog,
    stripe: StripeClient,
    webhook_mode: WebhookMode,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: SqlitePool) -> Self {
        let catalog = Catalog::new(config.products_file.clone());
        let stripe = StripeClient::new(&config.stripe);
        let webhook_mode = WebhookMode::from_config(&config.stripe);
        let email = match config.email.as_ref().map(EmailService::new) {
            Some(Ok(service)) => Some(service),
            Some(Err(err)) => {
                tracing::error!(error = %err, "Failed to set up SMTP relay, contact form disabled");
                None
            }
            None => None,
        };

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                stripe,
                webhook_mode,
                email,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the product catalog loader.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the Stripe API client.
    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }

    /// How incoming webhook events are authenticated, fixed at startup.
    #[must_use]
    pub fn webhook_mode(&self) -> &WebhookMode {
        &self.inner.webhook_mode
    }

    /// Get the contact-form email service, if configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}
