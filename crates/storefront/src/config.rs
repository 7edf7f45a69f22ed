//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional (all degrade with a warning rather than crashing)
//! - `STOREFRONT_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite:fondant_shop.db?mode=rwc`)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 5000)
//! - `BASE_URL` - Public URL for redirect construction
//!   (default: `http://localhost:5000`)
//! - `SESSION_SECRET` - Capability-token signing secret (min 32 chars;
//!   falls back to a development secret with a loud warning)
//! - `STRIPE_SECRET_KEY` - Stripe API secret key; checkout is disabled
//!   without it
//! - `STRIPE_PUBLISHABLE_KEY` - Stripe publishable key echoed to clients
//! - `STRIPE_WEBHOOK_SECRET` - Webhook signing secret; without it the
//!   webhook runs in unverified dev-only mode
//! - `PRODUCTS_FILE` - Catalog JSON path
//!   (default: `data/extracted_products.json`)
//! - `EMAIL_HOST` / `EMAIL_PORT` / `EMAIL_USER` / `EMAIL_PASSWORD` -
//!   SMTP settings for the contact form; unset disables it
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Development-only fallback for the session secret. Capability tokens
/// derived from it are forgeable; never deploy without `SESSION_SECRET`.
const DEV_SESSION_SECRET: &str = "fondant-dev-secret-do-not-use-in-production";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `SQLite` database connection URL
    pub database_url: String,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL used when building provider redirect URLs
    pub base_url: String,
    /// Secret for deriving per-order capability tokens
    pub session_secret: SecretString,
    /// Path to the catalog JSON file
    pub products_file: PathBuf,
    /// Stripe configuration
    pub stripe: StripeConfig,
    /// SMTP configuration for the contact form, when fully configured
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Stripe API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct StripeConfig {
    /// API secret key; `None` leaves checkout disabled
    pub secret_key: Option<SecretString>,
    /// Publishable key (safe to expose in the browser)
    pub publishable_key: String,
    /// Webhook signing secret; `None` selects unverified dev-only mode
    pub webhook_secret: Option<SecretString>,
}

impl StripeConfig {
    /// Whether the API secret key is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("publishable_key", &self.publishable_key)
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// SMTP configuration for outbound contact-form email.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    /// Missing integrations are logged and disabled rather than fatal;
    /// only malformed values (bad host/port, short explicit secret) error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a present variable fails to parse or an
    /// explicitly-set secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = match get_optional_env("STOREFRONT_DATABASE_URL") {
            Some(url) => url,
            None => {
                let fallback = "sqlite:fondant_shop.db?mode=rwc".to_owned();
                tracing::warn!(
                    "STOREFRONT_DATABASE_URL not set, using local database {fallback}"
                );
                fallback
            }
        };

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_owned(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_owned(), e.to_string())
            })?;

        let base_url = match get_optional_env("BASE_URL") {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None => {
                tracing::warn!("BASE_URL not set, redirect URLs will point at localhost");
                format!("http://localhost:{port}")
            }
        };

        let session_secret = match get_optional_env("SESSION_SECRET") {
            Some(secret) => {
                let secret = SecretString::from(strip_env_quotes(&secret));
                validate_session_secret(&secret, "SESSION_SECRET")?;
                secret
            }
            None => {
                tracing::warn!(
                    "SESSION_SECRET not set, falling back to an insecure development \
                     secret; order capability tokens are forgeable"
                );
                SecretString::from(DEV_SESSION_SECRET)
            }
        };

        let products_file =
            PathBuf::from(get_env_or_default("PRODUCTS_FILE", "data/extracted_products.json"));

        let stripe = StripeConfig::from_env();
        let email = EmailConfig::from_env();
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            products_file,
            stripe,
            email,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StripeConfig {
    fn from_env() -> Self {
        let secret_key = get_optional_env("STRIPE_SECRET_KEY")
            .map(|key| SecretString::from(strip_env_quotes(&key)));
        if secret_key.is_none() {
            tracing::warn!(
                "STRIPE_SECRET_KEY not set, payment processing is disabled until configured"
            );
        }

        let publishable_key = match get_optional_env("STRIPE_PUBLISHABLE_KEY") {
            Some(key) => strip_env_quotes(&key),
            None => {
                tracing::warn!("STRIPE_PUBLISHABLE_KEY not set, using test placeholder");
                "pk_test_default".to_owned()
            }
        };

        let webhook_secret = get_optional_env("STRIPE_WEBHOOK_SECRET")
            .map(|secret| SecretString::from(strip_env_quotes(&secret)));

        Self {
            secret_key,
            publishable_key,
            webhook_secret,
        }
    }
}

impl EmailConfig {
    fn from_env() -> Option<Self> {
        let smtp_username = get_optional_env("EMAIL_USER");
        let smtp_password = get_optional_env("EMAIL_PASSWORD");

        let (Some(smtp_username), Some(smtp_password)) = (smtp_username, smtp_password) else {
            tracing::warn!("EMAIL_USER/EMAIL_PASSWORD not set, contact form email disabled");
            return None;
        };

        let smtp_host = get_env_or_default("EMAIL_HOST", "smtp.gmail.com");
        let smtp_port = get_env_or_default("EMAIL_PORT", "587").parse().ok()?;

        Some(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password: SecretString::from(smtp_password),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Strip surrounding quotes left over from sloppy `.env` files.
fn strip_env_quotes(value: &str) -> String {
    value
        .trim()
        .trim_matches('\'')
        .trim_matches('"')
        .to_owned()
}

/// Validate that an explicitly-set session secret meets the minimum length.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}
