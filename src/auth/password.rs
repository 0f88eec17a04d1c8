//! Argon2id password hashing.
//!
//! Unit tests swap in reduced-cost parameters; everything else uses the
//! library defaults (19 MiB, 2 iterations, 1 lane).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
#[cfg(test)]
use argon2::{Algorithm, Params, Version};

use crate::errors::AppError;

fn argon2_instance() -> Argon2<'static> {
    #[cfg(test)]
    {
        let params = Params::new(1024, 1, 1, None).expect("valid Argon2 params for tests");
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }

    #[cfg(not(test))]
    {
        Argon2::default()
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2_instance()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// Returns false for a wrong password. A hash that cannot be parsed is an
/// error, since it means the stored value is corrupt.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AppError::PasswordHash(e.to_string()))?;

    Ok(argon2_instance()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
