//! HTTP Handlers

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use platform::password::ClearTextPassword;
use platform::template::Templates;
use serde::Serialize;

use crate::application::config::AuthConfig;
use crate::application::{AuthenticateUseCase, RegisterInput, RegisterUseCase};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::forms::{LoginForm, RegisterForm};
use crate::presentation::middleware::LOGIN_PATH;
use crate::presentation::session::Session;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub templates: Arc<Templates>,
}

#[derive(Serialize)]
struct FormPage<F> {
    form: F,
}

fn render<F: Serialize>(
    templates: &Templates,
    session: &Session,
    status: StatusCode,
    page: &str,
    form: F,
) -> AuthResult<Response> {
    let body = templates.render(page, &session.page(FormPage { form }))?;
    Ok((status, Html(body)).into_response())
}

fn home() -> Response {
    Redirect::to("/").into_response()
}

// ============================================================================
// Register
// ============================================================================

/// GET /user/register
pub async fn register_page<R>(
    State(state): State<AuthAppState<R>>,
    session: Session,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if session.is_authenticated() {
        return Ok(home());
    }

    render(
        &state.templates,
        &session,
        StatusCode::OK,
        "register.html",
        RegisterForm::default(),
    )
}

/// POST /user/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    session: Session,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if session.is_authenticated() {
        return Ok(home());
    }

    let Form(mut form) = form.map_err(|e| AuthError::MalformedForm(e.body_text()))?;

    if !form.validate() {
        return render(
            &state.templates,
            &session,
            StatusCode::UNPROCESSABLE_ENTITY,
            "register.html",
            form,
        );
    }

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        username: form.username.clone(),
        email: form.email.clone(),
        password: ClearTextPassword::new(std::mem::take(&mut form.password)),
    };

    match use_case.execute(input).await {
        Ok(_) => {}
        Err(AuthError::DuplicateUsername) => {
            form.validator
                .add_field_error("username", "Username is already in use");
            return render(
                &state.templates,
                &session,
                StatusCode::UNPROCESSABLE_ENTITY,
                "register.html",
                form,
            );
        }
        Err(AuthError::DuplicateEmail) => {
            form.validator
                .add_field_error("email", "Email address is already in use");
            return render(
                &state.templates,
                &session,
                StatusCode::UNPROCESSABLE_ENTITY,
                "register.html",
                form,
            );
        }
        Err(e) => return Err(e),
    }

    session.put_flash("User registered successfully");

    Ok(Redirect::to(LOGIN_PATH).into_response())
}

// ============================================================================
// Login
// ============================================================================

/// GET /user/login
pub async fn login_page<R>(
    State(state): State<AuthAppState<R>>,
    session: Session,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if session.is_authenticated() {
        return Ok(home());
    }

    render(
        &state.templates,
        &session,
        StatusCode::OK,
        "login.html",
        LoginForm::default(),
    )
}

/// POST /user/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    session: Session,
    form: Result<Form<LoginForm>, FormRejection>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if session.is_authenticated() {
        return Ok(home());
    }

    let Form(mut form) = form.map_err(|e| AuthError::MalformedForm(e.body_text()))?;

    if !form.validate() {
        return render(
            &state.templates,
            &session,
            StatusCode::UNPROCESSABLE_ENTITY,
            "login.html",
            form,
        );
    }

    let use_case = AuthenticateUseCase::new(state.repo.clone(), state.config.clone());
    let password = ClearTextPassword::new(std::mem::take(&mut form.password));

    let user_id = match use_case.execute(&form.username, password).await {
        Ok(user_id) => user_id,
        Err(AuthError::InvalidCredentials) => {
            form.validator
                .add_non_field_error("Username or password is incorrect");
            return render(
                &state.templates,
                &session,
                StatusCode::UNPROCESSABLE_ENTITY,
                "login.html",
                form,
            );
        }
        Err(e) => return Err(e),
    };

    session.renew_token();
    session.put_authenticated_user_id(user_id);
    session.put_flash("User logged in successfully");

    tracing::info!(user_id = %user_id, username = %form.username, "User logged in");

    Ok(home())
}

// ============================================================================
// Logout (requires authentication)
// ============================================================================

/// GET /user/logout
///
/// The user lookup only feeds the log line; a store failure there does not
/// change the response.
pub async fn logout<R>(State(state): State<AuthAppState<R>>, session: Session) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = session.get_authenticated_user_id();

    session.renew_token();
    session.remove_authenticated_user_id();
    session.put_flash("User logged out successfully");

    if let Some(user_id) = user_id {
        match state.repo.get(user_id).await {
            Ok(user) => {
                let username = user.map(|user| user.username);
                tracing::info!(user_id = %user_id, username = ?username, "User logged out");
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "User logged out, lookup failed");
            }
        }
    }

    Redirect::to(LOGIN_PATH).into_response()
}
