//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Duplicate user names/emails and bad credentials are recoverable: the
//! handlers turn them into a 422 re-render of the form. Everything that does
//! reach [`IntoResponse`] is either a client error or a 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use platform::template::TemplateError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// `users_uc_username` violated
    #[error("User name already exists")]
    DuplicateUsername,

    /// `users_uc_email` violated
    #[error("Email address already exists")]
    DuplicateEmail,

    /// Unknown user name or wrong password (deliberately indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session token is malformed or its signature does not verify
    #[error("Session not found or invalid")]
    SessionInvalid,

    /// Request body could not be decoded as a form
    #[error("Malformed form body: {0}")]
    MalformedForm(String),

    /// Password hashing error
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordHashError),

    /// Template error
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::DuplicateUsername | AuthError::DuplicateEmail => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::MalformedForm(_) => ErrorKind::BadRequest,
            AuthError::PasswordHash(_)
            | AuthError::Template(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Template(e) => {
                tracing::error!(error = %e, "Auth template error");
            }
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            // Pool timeouts and connection loss become 503
            AuthError::Database(e) => AppError::from(e).into_response(),
            other => other.to_app_error().into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::MalformedForm("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::DuplicateEmail.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_error_body_is_generic() {
        let err = AuthError::Internal("secret detail".into());
        let app_err = err.to_app_error();
        assert_eq!(app_err.public_message(), "Internal Server Error");
    }
}
