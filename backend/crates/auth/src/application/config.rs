//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::random_bytes;
use platform::password::PasswordHasher;

use crate::error::AuthResult;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Default idle lifetime of a session
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 3600);

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Session cookie attributes
    pub cookie: CookieConfig,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session lifetime, refreshed whenever the session is written
    pub session_ttl: Duration,
    /// Argon2id hasher shared by registration and login
    pub password_hasher: PasswordHasher,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("cookie", &self.cookie)
            .field("session_secret", &"[REDACTED]")
            .field("session_ttl", &self.session_ttl)
            .field("password_hasher", &self.password_hasher)
            .finish()
    }
}

impl AuthConfig {
    /// Production configuration
    pub fn new(session_secret: [u8; 32], cookie_secure: bool, session_ttl: Duration) -> AuthResult<Self> {
        Ok(Self {
            cookie: CookieConfig {
                secure: cookie_secure,
                ..CookieConfig::default()
            },
            session_secret,
            session_ttl,
            password_hasher: PasswordHasher::new()?,
        })
    }

    /// Create config for development (random secret, insecure cookie)
    pub fn development() -> AuthResult<Self> {
        Self::new(random_secret(), false, DEFAULT_SESSION_TTL)
    }

    /// Replace the password hasher, e.g. with a cheaper one in tests
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    /// Session TTL in seconds, for cookie `Max-Age`
    pub fn session_ttl_secs(&self) -> i64 {
        i64::try_from(self.session_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// Session TTL as a chrono duration, for record expiry
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::hours(12))
    }
}

/// Fresh 32-byte secret from the OS RNG
pub fn random_secret() -> [u8; 32] {
    let mut secret = [0u8; 32];
    secret.copy_from_slice(&random_bytes(32));
    secret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development().unwrap();
        assert!(!config.cookie.secure);
        assert_eq!(config.cookie.name, "session");
        assert_eq!(config.session_ttl_secs(), 12 * 3600);
        assert_ne!(config.session_secret, [0u8; 32]);
    }

    #[test]
    fn test_ttl_secs_saturates() {
        let mut config = AuthConfig::development().unwrap();
        config.session_ttl = Duration::MAX;
        assert_eq!(config.session_ttl_secs(), i64::MAX);
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = AuthConfig::development().unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("REDACTED"));
    }
}
