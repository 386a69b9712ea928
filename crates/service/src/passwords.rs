//! Password encoding for stored user records.
//!
//! `Plaintext` keeps the historical contract (the stored value is the
//! password). `Argon2` stores a PHC string instead; records written before the
//! switch still verify by verbatim comparison.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tokio::task;

pub use configs::PasswordScheme;

use crate::errors::ServiceError;

/// Encode `raw` for storage. Argon2 work runs on the blocking pool.
pub async fn encode(scheme: PasswordScheme, raw: String) -> Result<String, ServiceError> {
    match scheme {
        PasswordScheme::Plaintext => Ok(raw),
        PasswordScheme::Argon2 => task::spawn_blocking(move || hash_argon2(&raw))
            .await
            .map_err(|e| ServiceError::Internal(format!("password hashing task failed: {e}")))?,
    }
}

/// Check `raw` against a stored value. Argon2 work runs on the blocking pool.
pub async fn verify(scheme: PasswordScheme, raw: String, stored: String) -> Result<bool, ServiceError> {
    match scheme {
        PasswordScheme::Plaintext => Ok(raw == stored),
        PasswordScheme::Argon2 => task::spawn_blocking(move || verify_argon2(&raw, &stored))
            .await
            .map_err(|e| ServiceError::Internal(format!("password verification task failed: {e}"))),
    }
}

fn hash_argon2(raw: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))
}

// Values that are not PHC strings predate the switch and compare verbatim.
fn verify_argon2(raw: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(hash) => Argon2::default().verify_password(raw.as_bytes(), &hash).is_ok(),
        Err(_) => raw == stored,
    }
}
