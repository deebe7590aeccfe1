//! Presentation Layer
//!
//! Forms, the per-request session handle, middleware, handlers and router.

pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod session;

pub use handlers::AuthAppState;
pub use middleware::{SessionManager, load_and_save_session, require_authentication};
pub use router::auth_router;
pub use session::Session;
