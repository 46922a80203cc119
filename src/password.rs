//! Password hashing: Argon2id with per-hash random salts.

use crate::error::AuthError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, SaltString},
    Algorithm, Argon2, Params, PasswordVerifier, Version,
};

/// Slow, salted one-way hashing for account passwords.
///
/// The PHC string output embeds algorithm, parameters and salt, so `verify`
/// keeps working across parameter changes.
#[derive(Debug, Clone, Default)]
pub struct Hasher;

impl Hasher {
    fn argon2() -> Result<Argon2<'static>, AuthError> {
        let params = Params::new(
            32_768, // 32 MB
            3,      // iterations
            1,      // parallelism
            None,
        )
        .map_err(|e| AuthError::Hash(format!("invalid Argon2 params: {e}")))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a raw password into a PHC string.
    ///
    /// # Errors
    /// Returns `AuthError::Hash` if the hasher rejects its input.
    pub fn hash(&self, raw: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()?
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(format!("failed to hash password: {e}")))?;
        Ok(hash.to_string())
    }

    /// Check a raw password against a stored PHC string.
    ///
    /// # Errors
    /// Returns `AuthError::Hash` if the stored hash cannot be parsed.
    pub fn verify(&self, raw: &str, stored: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| AuthError::Hash(format!("invalid password hash format: {e}")))?;

        match Self::argon2()?.verify_password(raw.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hash(format!(
                "password verification failed: {e}"
            ))),
        }
    }
}
