//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

/// Registered user
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    /// Unique, matches the user name pattern
    pub username: String,
    /// Unique
    pub email: String,
    pub password_hash: HashedPassword,
    pub created: DateTime<Utc>,
}

/// User about to be inserted; the store assigns id and timestamp
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: HashedPassword,
}

/// What a credential check needs from the store
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: UserId,
    pub password_hash: HashedPassword,
}
