//! Error handling - maps domain failures to RFC 7807 responses.
//!
//! Recoverable failures carry a `redirect` hint pointing the client at
//! the flow that fixes them (the reference UI redirects with a flash
//! message). `Forbidden` is the one hard denial: a plain 403 with no
//! redirect.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_shared::ErrorResponse;
use std::fmt;

use quill_core::error::{DomainError, RepoError};

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Validation(String),
    DuplicateEmail,
    UnknownEmail,
    BadPassword,
    LoginRequired,
    Forbidden,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            AppError::DuplicateEmail => write!(f, "Email already registered"),
            AppError::UnknownEmail => write!(f, "Unknown email"),
            AppError::BadPassword => write!(f, "Bad password"),
            AppError::LoginRequired => write!(f, "Login required"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::UnknownEmail => StatusCode::UNAUTHORIZED,
            AppError::BadPassword => StatusCode::UNAUTHORIZED,
            AppError::LoginRequired => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail.clone()),
            AppError::Validation(detail) => {
                ErrorResponse::new(422, "Validation Failed").with_detail(detail.clone())
            }
            AppError::DuplicateEmail => ErrorResponse::new(409, "Email Already Registered")
                .with_detail(
                    "There is already a user registered with that email. \
                     If it's you, you might want to log in on this page instead.",
                )
                .with_redirect("/login"),
            AppError::UnknownEmail => ErrorResponse::unauthorized()
                .with_detail("That email does not exist, please try again.")
                .with_redirect("/login"),
            AppError::BadPassword => ErrorResponse::unauthorized()
                .with_detail("Password incorrect. Please try again.")
                .with_redirect("/login"),
            AppError::LoginRequired => ErrorResponse::unauthorized()
                .with_detail("You need to login or register to comment.")
                .with_redirect("/login?login_to_comment=true"),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Internal(detail) => {
                // Log internal errors, never leak them
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity, id))
            }
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::DuplicateEmail => AppError::DuplicateEmail,
            DomainError::UnknownEmail => AppError::UnknownEmail,
            DomainError::BadPassword => AppError::BadPassword,
            DomainError::LoginRequired => AppError::LoginRequired,
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Validation(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
