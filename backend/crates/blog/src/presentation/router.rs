//! Blog Router
//!
//! Mounted at the root. Expects the session layer from the `auth` crate to be
//! installed around it.

use auth::middleware::require_authentication;
use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use platform::template::Templates;

use crate::domain::repository::PostRepository;
use crate::presentation::handlers::{self, BlogAppState};

/// Create the Blog router for any repository implementation
pub fn blog_router<R>(repo: R, templates: Arc<Templates>) -> Router
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let state = BlogAppState {
        repo: Arc::new(repo),
        templates,
    };

    Router::new()
        .route(
            "/post/add",
            get(handlers::add_page::<R>).post(handlers::add::<R>),
        )
        .route(
            "/post/edit/{id}",
            get(handlers::edit_page::<R>).post(handlers::edit::<R>),
        )
        .route(
            "/post/delete/{id}",
            get(handlers::delete::<R>).post(handlers::delete::<R>),
        )
        .route_layer(middleware::from_fn(require_authentication))
        .route("/", get(handlers::index::<R>))
        .route("/post/view/{id}", get(handlers::view::<R>))
        .with_state(state)
}
