//! Argon2id password hashing, verification, and strength validation.
//!
//! All new hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`], stored in PHC string format so algorithm
//! parameters and salt travel with the hash.
//!
//! Databases migrated from the previous deployment still contain plaintext
//! credentials. [`verify_password`] accepts those too and reports the match
//! kind, so the login path can re-hash the credential on the first
//! successful plaintext match and retire the legacy form account by account.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Outcome of a successful credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMatch {
    /// Matched against a PHC-formatted Argon2id hash.
    Hashed,
    /// Matched against a stored plaintext credential; the caller should
    /// re-hash and persist before completing the login.
    LegacyPlaintext,
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt,
/// and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a submitted password against a stored credential.
///
/// A stored value that parses as a PHC string verifies through Argon2
/// (constant-time internally). Anything else is treated as a legacy
/// plaintext credential and compared in constant time. Returns
/// `Ok(Some(kind))` on a match, `Ok(None)` on a mismatch.
pub fn verify_password(
    password: &str,
    stored: &str,
) -> Result<Option<PasswordMatch>, argon2::password_hash::Error> {
    if let Ok(parsed_hash) = PasswordHash::new(stored) {
        return match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(Some(PasswordMatch::Hashed)),
            Err(argon2::password_hash::Error::Password) => Ok(None),
            Err(e) => Err(e),
        };
    }

    if constant_time_eq(password.as_bytes(), stored.as_bytes()) {
        Ok(Some(PasswordMatch::LegacyPlaintext))
    } else {
        Ok(None)
    }
}

/// Validate that a password meets minimum strength requirements.
///
/// Currently enforces a minimum character length. Returns `Ok(())` when the
/// password is acceptable, or `Err` with a human-readable explanation.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.len() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

/// Byte comparison whose running time does not depend on where the inputs
/// diverge. Length is not secret here (legacy credentials are short-lived).
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
