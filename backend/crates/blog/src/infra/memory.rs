//! In-Memory Repository Implementation
//!
//! Ids come from a counter and are never reused, like `BIGSERIAL`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use kernel::id::PostId;

use crate::domain::entities::Post;
use crate::domain::repository::PostRepository;
use crate::error::{BlogError, BlogResult};

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    posts: BTreeMap<PostId, Post>,
}

/// In-memory post repository. Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryPostRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PostRepository for MemoryPostRepository {
    async fn insert(&self, title: &str, content: &str) -> BlogResult<PostId> {
        let mut state = self.lock();
        state.last_id += 1;
        let id = PostId::new(state.last_id);

        state.posts.insert(
            id,
            Post {
                id,
                title: title.to_string(),
                content: content.to_string(),
                created: Utc::now(),
            },
        );

        Ok(id)
    }

    async fn get(&self, id: PostId) -> BlogResult<Post> {
        self.lock()
            .posts
            .get(&id)
            .cloned()
            .ok_or(BlogError::PostNotFound)
    }

    async fn get_all(&self) -> BlogResult<Vec<Post>> {
        Ok(self.lock().posts.values().rev().cloned().collect())
    }

    async fn update(&self, id: PostId, title: &str, content: &str) -> BlogResult<()> {
        let mut state = self.lock();
        let post = state.posts.get_mut(&id).ok_or(BlogError::PostNotFound)?;

        post.title = title.to_string();
        post.content = content.to_string();
        post.created = Utc::now();

        Ok(())
    }

    async fn delete(&self, id: PostId) -> BlogResult<()> {
        self.lock()
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(BlogError::PostNotFound)
    }
}
