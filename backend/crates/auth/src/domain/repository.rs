//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use uuid::Uuid;

use crate::domain::entity::{
    session::SessionRecord,
    user::{Credentials, NewUser, User},
};
use crate::error::AuthResult;
use kernel::id::UserId;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user.
    ///
    /// Fails with `DuplicateUsername` / `DuplicateEmail` when the matching
    /// unique constraint is violated.
    async fn insert(&self, user: &NewUser) -> AuthResult<UserId>;

    /// Id and password hash for a user name, if it exists
    async fn find_credentials(&self, username: &str) -> AuthResult<Option<Credentials>>;

    /// Find user by ID
    async fn get(&self, id: UserId) -> AuthResult<Option<User>>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Find a live session; expired rows are treated as missing
    async fn load(&self, id: Uuid) -> AuthResult<Option<SessionRecord>>;

    /// Insert or replace a session
    async fn save(&self, record: &SessionRecord) -> AuthResult<()>;

    /// Delete a session
    async fn remove(&self, id: Uuid) -> AuthResult<()>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
