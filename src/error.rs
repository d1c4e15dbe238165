//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the single error type shared by the store,
//! the services and the HTTP handlers.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so a handler returning
//! `Result<_, AppError>` is rendered as a JSON body of the form `{"error": "..."}`
//! with the matching status code. `From` implementations for `sqlx::Error`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error` and
//! `bcrypt::BcryptError` let callers use the `?` operator throughout.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
///
/// Every failure is terminal for the request that produced it: there are no
/// retries and no partial successes.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400).
    BadRequest(String),
    /// Missing, invalid or expired credentials or token (HTTP 401).
    Unauthorized(String),
    /// The caller is authenticated but does not own the resource.
    /// Answered as HTTP 401, like a missing token.
    Forbidden(String),
    /// A resolvable id that does not exist (HTTP 404).
    NotFound(String),
    /// A uniqueness constraint was violated, e.g. duplicate email.
    /// Answered as HTTP 400.
    Conflict(String),
    /// Unexpected failure in a library or the runtime (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the persistence layer (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Message exposed to the client. Internal details never leave the process.
    fn public_message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => "Server Error",
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Forbidden(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::InternalServerError(_) | AppError::DatabaseError(_) = self {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Unique-constraint violations become `Conflict` (the only unique column is the
/// user email), `RowNotFound` becomes `NotFound`, everything else is a
/// `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("User already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("Migration failed: {}", error))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::BadRequest`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::BadRequest(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
///
/// The library's reason (expired, bad signature, ...) is only logged.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("Token rejected: {}", error);
        AppError::Unauthorized("Not authorized, token failed".into())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// A blocking task panicked or was cancelled.
impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> AppError {
        AppError::InternalServerError(format!("Blocking task failed: {}", error))
    }
}
