//! Blog Error Types
//!
//! This module provides blog-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::ParseIdError;
use platform::template::TemplateError;
use thiserror::Error;

/// Blog-specific result type alias
pub type BlogResult<T> = Result<T, BlogError>;

/// Blog-specific error variants
#[derive(Debug, Error)]
pub enum BlogError {
    /// No post with this id, or the id in the path is not a positive integer
    #[error("Post not found")]
    PostNotFound,

    /// Request body could not be decoded as a form
    #[error("Malformed form body: {0}")]
    MalformedForm(String),

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

impl BlogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BlogError::PostNotFound => StatusCode::NOT_FOUND,
            BlogError::MalformedForm(_) => StatusCode::BAD_REQUEST,
            BlogError::Template(_) | BlogError::Database(_) | BlogError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlogError::PostNotFound => ErrorKind::NotFound,
            BlogError::MalformedForm(_) => ErrorKind::BadRequest,
            BlogError::Template(_) | BlogError::Database(_) | BlogError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            BlogError::Database(e) => {
                tracing::error!(error = %e, "Blog database error");
            }
            BlogError::Template(e) => {
                tracing::error!(error = %e, "Blog template error");
            }
            BlogError::Internal(msg) => {
                tracing::error!(message = %msg, "Blog internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Blog error");
            }
        }
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            // Pool timeouts and connection loss become 503
            BlogError::Database(e) => AppError::from(e).into_response(),
            other => other.to_app_error().into_response(),
        }
    }
}

impl From<ParseIdError> for BlogError {
    fn from(_: ParseIdError) -> Self {
        BlogError::PostNotFound
    }
}
