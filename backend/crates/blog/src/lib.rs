//! Blog Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Post entity and repository trait
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - Post form, handlers, router
//!
//! Reading is public. Adding, editing and deleting posts sit behind
//! `auth::middleware::require_authentication`.

pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use error::{BlogError, BlogResult};
pub use infra::memory::MemoryPostRepository;
pub use infra::postgres::PgPostRepository;
pub use presentation::router::blog_router;
