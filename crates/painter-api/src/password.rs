use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString},
};
use rand_core::OsRng;

/// Hash a credential with Argon2id and a fresh random salt.
/// Returns the PHC string stored in `users.password`.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Password hashing failed: {}", e))?;

    Ok(hash.to_string())
}

/// Check a credential against a stored PHC string. A mismatch is `Ok(false)`;
/// a hash that cannot be parsed is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(stored_hash).map_err(|e| anyhow!("Corrupt password hash: {}", e))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("Password verification failed: {}", e)),
    }
}

/// Hash checked when no user matches, so a lookup for an unknown username
/// costs the same Argon2 work as a wrong password.
static UNKNOWN_USER_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("unknown-user-placeholder").ok());

/// Run a full verification against a throwaway hash. Always `false`.
pub fn verify_unknown_user(password: &str) -> Result<bool> {
    match UNKNOWN_USER_HASH.as_deref() {
        Some(hash) => {
            verify_password(password, hash)?;
            Ok(false)
        }
        None => Err(anyhow!("Placeholder password hash unavailable")),
    }
}
