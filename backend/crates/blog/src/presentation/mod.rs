//! Presentation Layer
//!
//! HTTP handlers, the post form and the router.

pub mod forms;
pub mod handlers;
pub mod router;

// Re-exports
pub use forms::PostForm;
pub use handlers::BlogAppState;
pub use router::blog_router;
