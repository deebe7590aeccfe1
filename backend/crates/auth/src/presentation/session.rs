//! Per-request Session Handle
//!
//! [`load_and_save_session`](super::middleware::load_and_save_session) puts a
//! [`Session`] into the request extensions; handlers take it as an extractor.
//! Mutations are buffered in memory and written back once the handler has
//! produced its response.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kernel::id::UserId;
use platform::template::PageData;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entity::session::{SessionData, SessionRecord};
use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Unchanged,
    Modified,
    /// New id issued; `stale` is the stored record to delete, if any
    Renewed { stale: Option<Uuid> },
}

#[derive(Debug)]
struct SessionState {
    /// Id of the stored record this session was loaded from
    record_id: Option<Uuid>,
    data: SessionData,
    status: Status,
}

/// Changes the middleware has to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingSave {
    pub id: Uuid,
    pub data: SessionData,
    pub stale: Option<Uuid>,
}

/// Session handle shared between the middleware and the handler
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    /// Fresh anonymous session, not stored until something is put into it
    pub fn new() -> Self {
        Self::with_state(None, SessionData::default())
    }

    /// Session backed by a stored record
    pub fn from_record(record: SessionRecord) -> Self {
        Self::with_state(Some(record.id), record.data)
    }

    fn with_state(record_id: Option<Uuid>, data: SessionData) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                record_id,
                data,
                status: Status::Unchanged,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn modify<T>(&self, f: impl FnOnce(&mut SessionData) -> T) -> T {
        let mut state = self.lock();
        let out = f(&mut state.data);
        if state.status == Status::Unchanged {
            state.status = Status::Modified;
        }
        out
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    pub fn get_authenticated_user_id(&self) -> Option<UserId> {
        self.lock().data.authenticated_user_id
    }

    pub fn put_authenticated_user_id(&self, user_id: UserId) {
        self.modify(|data| data.authenticated_user_id = Some(user_id));
    }

    pub fn remove_authenticated_user_id(&self) {
        self.modify(|data| data.authenticated_user_id = None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_authenticated_user_id().is_some()
    }

    // ========================================================================
    // Flash
    // ========================================================================

    pub fn put_flash(&self, message: impl Into<String>) {
        let message = message.into();
        self.modify(|data| data.flash = Some(message));
    }

    /// Read and clear the flash message
    pub fn pop_flash(&self) -> Option<String> {
        let mut state = self.lock();
        let flash = state.data.flash.take();
        if flash.is_some() && state.status == Status::Unchanged {
            state.status = Status::Modified;
        }
        flash
    }

    // ========================================================================
    // Token
    // ========================================================================

    /// Move the data to a new session id and drop the old record.
    ///
    /// Called around privilege changes so a token captured before login is
    /// useless afterwards.
    pub fn renew_token(&self) {
        let mut state = self.lock();
        let stale = state.record_id.take();
        state.status = match state.status {
            Status::Renewed { stale: earlier } => Status::Renewed {
                stale: earlier.or(stale),
            },
            _ => Status::Renewed { stale },
        };
    }

    /// Common page fields; pops the flash
    pub fn page<T: Serialize>(&self, page: T) -> PageData<T> {
        PageData::new(self.pop_flash(), self.is_authenticated(), page)
    }

    /// Buffered changes, if any. Assigns a new id to sessions not yet stored.
    pub(crate) fn pending_save(&self) -> Option<PendingSave> {
        let mut state = self.lock();
        let stale = match state.status {
            Status::Unchanged => return None,
            Status::Modified => None,
            Status::Renewed { stale } => stale,
        };

        let id = *state.record_id.get_or_insert_with(Uuid::new_v4);
        state.status = Status::Unchanged;

        Some(PendingSave {
            id,
            data: state.data.clone(),
            stale,
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AuthError::Internal("Session layer is not installed".to_string()))
    }
}
