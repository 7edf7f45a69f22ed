//! Email service for the contact form.
//!
//! Sends contact-form submissions to the shop owner's inbox over SMTP via
//! lettre. The owner's SMTP account is both sender and recipient; the
//! customer's address goes in `Reply-To` so the owner can answer directly.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// A contact-form submission.
#[derive(Debug)]
pub struct ContactMessage<'m> {
    pub name: &'m str,
    pub email: &'m str,
    pub message: &'m str,
}

/// Email service for outbound contact-form mail.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    owner_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_owned(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            owner_address: config.smtp_username.clone(),
        })
    }

    /// Forward a contact-form submission to the shop owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or sent.
    pub async fn send_contact_message(&self, contact: &ContactMessage<'_>) -> Result<(), EmailError> {
        let owner = self
            .owner_address
            .parse()
            .map_err(|_| EmailError::InvalidAddress(self.owner_address.clone()))?;
        let reply_to = contact
            .email
            .parse()
            .map_err(|_| EmailError::InvalidAddress(contact.email.to_owned()))?;

        let body = format!(
            "New contact form message\n\nName: {}\nEmail: {}\n\n{}\n",
            contact.name, contact.email, contact.message
        );

        let email = Message::builder()
            .from(owner)
            .to(
                self.owner_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.owner_address.clone()))?,
            )
            .reply_to(reply_to)
            .subject(format!("Contact form: {}", contact.name))
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(email).await?;
        tracing::info!("Contact form message forwarded");
        Ok(())
    }
}
