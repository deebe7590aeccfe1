//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! There is no optimistic locking: concurrent updates to one post are
//! serialized by the store and the last write wins.

use kernel::id::PostId;

use crate::domain::entities::Post;
use crate::error::BlogResult;

/// Post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    /// Insert a post and return its id
    async fn insert(&self, title: &str, content: &str) -> BlogResult<PostId>;

    /// Find post by ID; `PostNotFound` if missing
    async fn get(&self, id: PostId) -> BlogResult<Post>;

    /// All posts, newest id first
    async fn get_all(&self) -> BlogResult<Vec<Post>>;

    /// Replace title and content; `PostNotFound` if missing
    async fn update(&self, id: PostId, title: &str, content: &str) -> BlogResult<()>;

    /// Delete a post; `PostNotFound` if missing
    async fn delete(&self, id: PostId) -> BlogResult<()>;
}
