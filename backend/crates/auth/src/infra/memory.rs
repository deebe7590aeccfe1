//! In-Memory Repository Implementations
//!
//! Same contracts as the PostgreSQL repository, including the unique
//! constraints on user name and email (emails compared ignoring case). Used
//! by tests and for running the server without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::{
    session::SessionRecord,
    user::{Credentials, NewUser, User},
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    sessions: HashMap<Uuid, SessionRecord>,
}

/// In-memory auth repository. Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored sessions, expired ones included
    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn insert(&self, user: &NewUser) -> AuthResult<UserId> {
        let mut state = self.lock();

        if state.users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::DuplicateUsername);
        }
        let email = user.email.to_lowercase();
        if state.users.iter().any(|u| u.email.to_lowercase() == email) {
            return Err(AuthError::DuplicateEmail);
        }

        let id = UserId::new(state.users.len() as i64 + 1);
        state.users.push(User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created: Utc::now(),
        });

        Ok(id)
    }

    async fn find_credentials(&self, username: &str) -> AuthResult<Option<Credentials>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| Credentials {
                user_id: u.id,
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn get(&self, id: UserId) -> AuthResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }
}

impl SessionRepository for MemoryAuthRepository {
    async fn load(&self, id: Uuid) -> AuthResult<Option<SessionRecord>> {
        Ok(self
            .lock()
            .sessions
            .get(&id)
            .filter(|record| !record.is_expired())
            .cloned())
    }

    async fn save(&self, record: &SessionRecord) -> AuthResult<()> {
        self.lock().sessions.insert(record.id, record.clone());
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> AuthResult<()> {
        self.lock().sessions.remove(&id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let mut state = self.lock();
        let before = state.sessions.len();
        state.sessions.retain(|_, record| !record.is_expired());
        Ok((before - state.sessions.len()) as u64)
    }
}
