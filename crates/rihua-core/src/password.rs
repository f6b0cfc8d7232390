//! Password hashing and verification (bcrypt).
//!
//! Only the yes/no outcome of verification is meaningful to callers; the
//! stored hash format is whatever bcrypt produces.

use std::sync::LazyLock;

use bcrypt::{hash, verify};

use crate::errors::AppError;

/// Work factor used for newly hashed passwords.
pub const PASSWORD_HASH_COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, PASSWORD_HASH_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to verify password: {}", e)))
}

/// Hash of a password no account can have, at the production cost.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("rihua-no-such-account", PASSWORD_HASH_COST).ok());

/// Runs one verification at [`PASSWORD_HASH_COST`] against a hash no
/// account owns. Login calls this when the email is unknown, so that path
/// costs as much as a wrong password.
pub fn verify_dummy_password(password: &str) -> bool {
    DUMMY_HASH
        .as_deref()
        .is_some_and(|dummy| verify(password, dummy).unwrap_or(false))
}
