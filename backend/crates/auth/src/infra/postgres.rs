//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::violated_unique_constraint;
use kernel::id::UserId;
use platform::password::HashedPassword;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::{
    session::{SessionData, SessionRecord},
    user::{Credentials, NewUser, User},
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

const USERNAME_CONSTRAINT: &str = "users_uc_username";
const EMAIL_CONSTRAINT: &str = "users_uc_email";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique violation on one of the user constraints to its domain error
fn map_insert_error(err: sqlx::Error) -> AuthError {
    let duplicate = match violated_unique_constraint(&err) {
        Some(USERNAME_CONSTRAINT) => Some(AuthError::DuplicateUsername),
        Some(EMAIL_CONSTRAINT) => Some(AuthError::DuplicateEmail),
        _ => None,
    };

    match duplicate {
        Some(duplicate) => duplicate,
        None => AuthError::Database(err),
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn insert(&self, user: &NewUser) -> AuthResult<UserId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, email, password_hash, created)
            VALUES ($1, $2, $3, NOW())
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.password_hash.as_phc_string())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(UserId::new(id))
    }

    async fn find_credentials(&self, username: &str) -> AuthResult<Option<Credentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            "SELECT id, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_credentials()).transpose()
    }

    async fn get(&self, id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                username,
                email,
                password_hash,
                created
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn load(&self, id: Uuid) -> AuthResult<Option<SessionRecord>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, data, expires_at
            FROM sessions
            WHERE id = $1 AND expires_at > NOW()
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_record))
    }

    async fn save(&self, record: &SessionRecord) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, data, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                data = EXCLUDED.data,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(record.id)
        .bind(Json(&record.data))
        .bind(record.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    created: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            id: UserId::new(self.id),
            username: self.username,
            email: self.email,
            password_hash: HashedPassword::from_phc_string(self.password_hash)?,
            created: self.created,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: i64,
    password_hash: String,
}

impl CredentialsRow {
    fn into_credentials(self) -> AuthResult<Credentials> {
        Ok(Credentials {
            user_id: UserId::new(self.id),
            password_hash: HashedPassword::from_phc_string(self.password_hash)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    data: Json<SessionData>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_record(self) -> SessionRecord {
        SessionRecord {
            id: self.id,
            data: self.data.0,
            expires_at: self.expires_at,
        }
    }
}
