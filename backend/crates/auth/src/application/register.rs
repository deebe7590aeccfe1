//! Register Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::NewUser;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Register input, already validated by the form
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: ClearTextPassword,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<UserId> {
        // Argon2 is CPU-bound; keep it off the async workers
        let hasher = self.config.password_hasher.clone();
        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))??;

        let user = NewUser {
            username: input.username,
            email: input.email,
            password_hash,
        };

        let user_id = self.user_repo.insert(&user).await?;

        tracing::info!(
            user_id = %user_id,
            username = %user.username,
            "User registered"
        );

        Ok(user_id)
    }
}
