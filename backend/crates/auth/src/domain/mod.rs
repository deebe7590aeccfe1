//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    session::{SessionData, SessionRecord},
    user::{Credentials, NewUser, User},
};
pub use repository::{SessionRepository, UserRepository};
pub use value_object::session_token::SessionToken;
