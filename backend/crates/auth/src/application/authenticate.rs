//! Authenticate Use Case
//!
//! Checks a user name / password pair.

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Authenticate use case
pub struct AuthenticateUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> AuthenticateUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Id of the matching user, or `InvalidCredentials`.
    ///
    /// Unknown user names are verified against a dummy hash so both failure
    /// paths cost one Argon2 verification.
    pub async fn execute(&self, username: &str, password: ClearTextPassword) -> AuthResult<UserId> {
        let credentials = self.user_repo.find_credentials(username).await?;

        let hasher = self.config.password_hasher.clone();
        let verified = tokio::task::spawn_blocking(move || match credentials {
            Some(c) => hasher
                .verify(&c.password_hash, &password)
                .then_some(c.user_id),
            None => {
                hasher.verify_dummy(&password);
                None
            }
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))?;

        match verified {
            Some(user_id) => Ok(user_id),
            None => {
                tracing::info!(username = %username, "Login rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
