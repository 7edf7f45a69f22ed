//! Per-order capability tokens.
//!
//! Order confirmation links carry a short token derived from the order ID,
//! the owning user ID, and the server secret. Anyone holding the link can
//! view that one order without logging in; the token grants nothing else.
//!
//! The token is the first 16 hex characters of
//! `sha256("{order_id}-{user_id}-{secret}")`. Links already in the wild
//! depend on this exact derivation.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use fondant_core::types::{OrderId, UserId};

/// Length of the token in hex characters.
const TOKEN_LENGTH: usize = 16;

/// Derive the capability token for an order.
#[must_use]
pub fn generate(order_id: OrderId, user_id: UserId, secret: &SecretString) -> String {
    let material = format!("{order_id}-{user_id}-{}", secret.expose_secret());
    let digest = Sha256::digest(material.as_bytes());
    let mut token = hex::encode(digest);
    token.truncate(TOKEN_LENGTH);
    token
}

/// Check a presented token against the expected one for an order.
///
/// Comparison is constant-time over the full token length so response
/// timing does not leak how many leading characters matched.
#[must_use]
pub fn verify(
    presented: &str,
    order_id: OrderId,
    user_id: UserId,
    secret: &SecretString,
) -> bool {
    let expected = generate(order_id, user_id, secret);
    constant_time_eq(presented.as_bytes(), expected.as_bytes())
}

/// Constant-time byte comparison.
///
/// XOR-folds every byte pair before deciding, so runtime depends only on
/// the input lengths.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
