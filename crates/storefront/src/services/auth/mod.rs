//! Authentication service.
//!
//! Email-and-password accounts with argon2 hashing. Login failures are
//! always reported as a single `InvalidCredentials` error so responses
//! never reveal whether the email has an account.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use fondant_core::types::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Fields submitted on the registration form.
#[derive(Debug)]
pub struct Registration<'r> {
    pub first_name: &'r str,
    pub last_name: &'r str,
    pub email: &'r str,
    pub password: &'r str,
    pub confirm_password: &'r str,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if any field is blank, the passwords
    /// do not match, the password is too short, or the email is malformed.
    /// Returns `AuthError::EmailTaken` if the email already has an account.
    pub async fn register(&self, registration: Registration<'_>) -> Result<User, AuthError> {
        let first_name = registration.first_name.trim();
        let last_name = registration.last_name.trim();

        if first_name.is_empty()
            || last_name.is_empty()
            || registration.email.trim().is_empty()
            || registration.password.is_empty()
        {
            return Err(AuthError::Validation("All fields are required".to_owned()));
        }
        if registration.password != registration.confirm_password {
            return Err(AuthError::Validation("Passwords do not match".to_owned()));
        }
        if registration.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let email = Email::parse(registration.email)
            .map_err(|e| AuthError::Validation(format!("Invalid email address: {e}")))?;

        let password_hash = hash_password(registration.password)?;

        let user = self
            .users
            .create(first_name, last_name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "New account registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let password_hash = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        self.users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("hunter2secret").unwrap();
        assert!(verify_password("hunter2secret", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("hunter2secret").unwrap();
        let second = hash_password("hunter2secret").unwrap();
        assert_ne!(first, second);
    }
}
