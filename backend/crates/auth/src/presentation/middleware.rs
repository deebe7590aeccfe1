//! Session Middleware
//!
//! - [`load_and_save_session`] loads the session named by the cookie before
//!   the handler runs and persists it afterwards.
//! - [`require_authentication`] is the auth gate for protected routes.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::application::config::AuthConfig;
use crate::domain::entity::session::SessionRecord;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::session_token::SessionToken;
use crate::error::{AuthError, AuthResult};
use crate::presentation::session::Session;

/// Where the auth gate sends anonymous users
pub const LOGIN_PATH: &str = "/user/login";

/// Middleware state
#[derive(Clone)]
pub struct SessionManager<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<AuthConfig>,
}

impl<S> SessionManager<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    pub fn new(store: S, config: Arc<AuthConfig>) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    fn session_cookie(&self, headers: &HeaderMap) -> Option<String> {
        platform::cookie::extract_cookie(headers, &self.config.cookie.name)
    }

    /// Session for the cookie value; anonymous if absent, forged or expired
    async fn load(&self, cookie: Option<&str>) -> AuthResult<Session> {
        let Some(cookie) = cookie else {
            return Ok(Session::new());
        };

        let token = match SessionToken::verify(cookie, &self.config.session_secret) {
            Ok(token) => token,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring session cookie");
                return Ok(Session::new());
            }
        };

        Ok(match self.store.load(token.session_id()).await? {
            Some(record) => Session::from_record(record),
            None => Session::new(),
        })
    }

    /// Write back buffered changes and (re)issue the cookie
    async fn save(&self, session: &Session, response: &mut Response) -> AuthResult<()> {
        let Some(pending) = session.pending_save() else {
            return Ok(());
        };

        let record = SessionRecord::new(pending.id, pending.data, self.config.session_ttl_chrono());
        self.store.save(&record).await?;

        if let Some(stale) = pending.stale {
            self.store.remove(stale).await?;
            tracing::debug!(session_id = %record.id, "Session token renewed");
        }

        let token = SessionToken::new(record.id).sign(&self.config.session_secret);
        let cookie = self
            .config
            .cookie
            .build_set_cookie(&token, self.config.session_ttl_secs());
        let cookie = HeaderValue::from_str(&cookie)
            .map_err(|e| AuthError::Internal(format!("Invalid Set-Cookie value: {e}")))?;

        let headers = response.headers_mut();
        headers.append(header::SET_COOKIE, cookie);
        headers.append(header::VARY, HeaderValue::from_static("Cookie"));

        Ok(())
    }
}

/// Load the session before the handler and save it after.
///
/// Store failures on either side become a 500.
pub async fn load_and_save_session<S>(
    State(manager): State<SessionManager<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    S: SessionRepository + Send + Sync + 'static,
{
    let cookie = manager.session_cookie(req.headers());
    let session = manager.load(cookie.as_deref()).await?;
    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;

    manager.save(&session, &mut response).await?;

    Ok(response)
}

/// Redirect anonymous users to the login page.
///
/// Responses from gated routes must not be cached by the browser.
pub async fn require_authentication(session: Session, req: Request<Body>, next: Next) -> Response {
    let mut response = if session.is_authenticated() {
        next.run(req).await
    } else {
        tracing::debug!(path = %req.uri().path(), "Unauthenticated request redirected to login");
        Redirect::to(LOGIN_PATH).into_response()
    };

    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
