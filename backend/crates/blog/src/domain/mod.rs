//! Domain Layer
//!
//! Contains the post entity and repository trait.

pub mod entities;
pub mod repository;

// Re-exports
pub use entities::Post;
pub use repository::PostRepository;
