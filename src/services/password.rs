// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password hashing.
//!
//! bcrypt is deliberately slow, so hashing and verification run on the
//! blocking thread pool rather than on the async runtime.

use crate::error::{AppError, Result};
use tokio::sync::OnceCell;

/// Hash checked when the account does not exist, created on first use.
static UNKNOWN_USER_HASH: OnceCell<String> = OnceCell::const_new();

/// Hash a password with the given bcrypt cost.
pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Hash task failed: {}", e)))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Check a password against a stored hash.
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Verify task failed: {}", e)))
}

/// Do the same bcrypt work as a real check for an account that does not
/// exist, so unknown emails take as long as wrong passwords. Always `false`.
pub async fn verify_unknown_user(password: &str, cost: u32) -> Result<bool> {
    let hash = UNKNOWN_USER_HASH
        .get_or_try_init(|| hash_password("fitrank-unknown-user", cost))
        .await?;
    verify_password(password, hash).await?;
    Ok(false)
}
