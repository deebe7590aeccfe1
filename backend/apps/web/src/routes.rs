//! Route Composition
//!
//! Layers, outermost first: panic recovery, request logging, security
//! headers, session. The auth gate is a route layer inside the blog and
//! auth routers. `/static` is served outside the session layer.

use std::path::Path;
use std::sync::Arc;

use auth::AuthConfig;
use auth::domain::repository::{SessionRepository, UserRepository};
use auth::middleware::{SessionManager, load_and_save_session};
use axum::Router;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use blog::domain::repository::PostRepository;
use kernel::error::app_error::AppError;
use platform::template::Templates;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::{handle_panic, request_span, secure_headers};

/// Build the application for any repository implementations
pub fn app<U, P>(
    users: U,
    posts: P,
    config: Arc<AuthConfig>,
    templates: Arc<Templates>,
    static_dir: impl AsRef<Path>,
) -> Router
where
    U: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    P: PostRepository + Clone + Send + Sync + 'static,
{
    let router = Router::new()
        .merge(auth::auth_router(
            users.clone(),
            config.clone(),
            templates.clone(),
        ))
        .merge(blog::blog_router(posts, templates))
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            SessionManager::new(users, config),
            load_and_save_session::<U>,
        ))
        .nest_service("/static", ServeDir::new(static_dir));

    with_outer_layers(router)
}

/// Security headers, request logging and panic recovery
pub fn with_outer_layers(router: Router) -> Router {
    router
        .layer(middleware::from_fn(secure_headers))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(CatchPanicLayer::custom(handle_panic))
}

async fn not_found() -> Response {
    AppError::not_found("Not Found").into_response()
}
