//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, salted, PHC string output)
//! - Zeroization of clear text passwords
//! - Constant-time verification, including for unknown accounts
//!
//! Hashing parameters are fixed when the [`PasswordHasher`] is built; stored
//! hashes carry their own parameters, so verification keeps working if the
//! cost is raised later.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::random_bytes;

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid cost parameters
    #[error("Invalid Argon2 parameters: {0}")]
    InvalidParams(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Wrap a submitted password. Policy (length etc.) is enforced by the
    /// form validator before this point.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Argon2id hasher with cost parameters fixed at construction
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Hash of a random password, verified against when the account is unknown
    dummy: HashedPassword,
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", self.argon2.params())
            .finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
    pub fn new() -> Result<Self, PasswordHashError> {
        Self::from_params(Params::default())
    }

    /// Custom cost, in KiB of memory, iterations and lanes
    pub fn with_cost(memory_kib: u32, iterations: u32, lanes: u32) -> Result<Self, PasswordHashError> {
        let params = Params::new(memory_kib, iterations, lanes, None)
            .map_err(|e| PasswordHashError::InvalidParams(e.to_string()))?;
        Self::from_params(params)
    }

    fn from_params(params: Params) -> Result<Self, PasswordHashError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_secret = ClearTextPassword(crate::crypto::to_base64(&random_bytes(24)));
        let dummy = hash_with(&argon2, &dummy_secret)?;
        Ok(Self { argon2, dummy })
    }

    /// Salt and hash a password
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        hash_with(&self.argon2, password)
    }

    /// Verify a password against a stored hash
    pub fn verify(&self, hashed: &HashedPassword, password: &ClearTextPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(&hashed.hash) else {
            return false;
        };

        // Argon2 uses constant-time comparison internally
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Spend one verification's worth of work and fail.
    ///
    /// Called when the account does not exist so that an unknown user name
    /// takes as long to reject as a wrong password.
    pub fn verify_dummy(&self, password: &ClearTextPassword) -> bool {
        let _ = self.verify(&self.dummy, password);
        false
    }
}

fn hash_with(
    argon2: &Argon2<'static>,
    password: &ClearTextPassword,
) -> Result<HashedPassword, PasswordHashError> {
    // Random salt (128 bits = 16 bytes)
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

    Ok(HashedPassword {
        hash: hash.to_string(),
    })
}
