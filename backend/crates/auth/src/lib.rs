//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User and session entities, repository traits
//! - `application/` - Registration and credential check use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - Forms, session handle, middleware, handlers, router
//!
//! ## Features
//! - Registration with user name, email and password
//! - Login/logout backed by a server-side session
//! - One-shot flash messages carried in the session
//! - Auth gate middleware for protected routes
//!
//! ## Security Model
//! - Passwords hashed with Argon2id; unknown users cost one dummy verification
//! - The cookie holds only an HMAC-signed session id, data stays server-side
//! - Session id is renewed on login and logout

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::MemoryAuthRepository;
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;
pub use presentation::session::Session;

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
