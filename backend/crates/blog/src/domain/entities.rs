//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::PostId;
use serde::Serialize;

/// Blog post
///
/// `title` is non-blank and at most 140 characters; the post form enforces
/// this before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    /// Set by the store on insert and on every update
    pub created: DateTime<Utc>,
}
