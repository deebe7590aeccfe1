//! Session Token
//!
//! Cookie value format: `{uuid}.{base64url(HMAC-SHA256(uuid))}`.
//! A token that fails verification is treated as no token at all.

use platform::crypto;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Signed reference to a server-side session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn new(session_id: Uuid) -> Self {
        Self(session_id)
    }

    pub fn session_id(&self) -> Uuid {
        self.0
    }

    /// Encode for the cookie
    pub fn sign(&self, secret: &[u8]) -> String {
        let id = self.0.to_string();
        let signature = crypto::sign(secret, id.as_bytes());
        format!("{id}.{signature}")
    }

    /// Parse and verify a cookie value
    pub fn verify(token: &str, secret: &[u8]) -> AuthResult<Self> {
        let (id, signature) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;

        if !crypto::verify(secret, id.as_bytes(), signature) {
            return Err(AuthError::SessionInvalid);
        }

        id.parse()
            .map(Self)
            .map_err(|_| AuthError::SessionInvalid)
    }
}
