//! Auth Router
//!
//! Mounted at the root: paths are `/user/...`. The session layer is applied
//! by the binary around the merged application router.

use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use platform::template::Templates;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_authentication;

/// Create the Auth router for any repository implementation
pub fn auth_router<R>(repo: R, config: Arc<AuthConfig>, templates: Arc<Templates>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config,
        templates,
    };

    Router::new()
        .route("/user/logout", get(handlers::logout::<R>))
        .route_layer(middleware::from_fn(require_authentication))
        .route(
            "/user/register",
            get(handlers::register_page::<R>).post(handlers::register::<R>),
        )
        .route(
            "/user/login",
            get(handlers::login_page::<R>).post(handlers::login::<R>),
        )
        .with_state(state)
}
