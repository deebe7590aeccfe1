//! Session Entity
//!
//! Server-side session state. The client only ever sees a signed id.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Values carried by a session, stored as JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated_user_id: Option<UserId>,
    /// One-shot notice, cleared when read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,
}

/// Stored session row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: Uuid,
    pub data: SessionData,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Record that expires `ttl` from now
    pub fn new(id: Uuid, data: SessionData, ttl: Duration) -> Self {
        Self {
            id,
            data,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
