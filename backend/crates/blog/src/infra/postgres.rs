//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::PostId;
use sqlx::PgPool;

use crate::domain::entities::Post;
use crate::domain::repository::PostRepository;
use crate::error::{BlogError, BlogResult};

/// PostgreSQL-backed post repository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PostRepository for PgPostRepository {
    async fn insert(&self, title: &str, content: &str) -> BlogResult<PostId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO posts (title, content, created)
            VALUES ($1, $2, NOW())
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(PostId::new(id))
    }

    async fn get(&self, id: PostId) -> BlogResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, content, created FROM posts WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PostRow::into_post).ok_or(BlogError::PostNotFound)
    }

    async fn get_all(&self) -> BlogResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, content, created FROM posts ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn update(&self, id: PostId, title: &str, content: &str) -> BlogResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE posts SET
                title = $2,
                content = $3,
                created = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .bind(title)
        .bind(content)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(BlogError::PostNotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: PostId) -> BlogResult<()> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(BlogError::PostNotFound);
        }

        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    created: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: PostId::new(self.id),
            title: self.title,
            content: self.content,
            created: self.created,
        }
    }
}
