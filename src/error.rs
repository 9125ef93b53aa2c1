use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ApiResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Already clocked in today")]
    AlreadyClockedIn,

    #[error("Attendance already completed today")]
    AlreadyCompleted,

    #[error("No open attendance session today")]
    NoOpenSession,

    #[error("{0}")]
    AlreadyDecided(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidDateRange(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyClockedIn => StatusCode::CONFLICT,
            AppError::AlreadyCompleted => StatusCode::CONFLICT,
            AppError::NoOpenSession => StatusCode::CONFLICT,
            AppError::AlreadyDecided(_) => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        // Storage detail stays in the log; the client gets a generic body.
        let error_message = match self {
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                log::error!("Request failed with status {}: {}", status_code, self);
                "Internal server error".to_string()
            }
            _ => {
                log::warn!("Request failed with status {}: {}", status_code, self);
                self.to_string()
            }
        };

        let response_body = ApiResponse::<()>::error(&error_message);

        HttpResponse::build(status_code).json(response_body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Query failed: {}", error);
        AppError::DatabaseError(error)
    }
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn invalid_date(message: impl Into<String>) -> Self {
        AppError::InvalidDate(message.into())
    }

    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }

    pub fn internal_server_error() -> Self {
        AppError::InternalServerError(None)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Repository error: {:#}", error);

        // A wrapped sqlx::Error keeps its own variant instead of arriving
        // as a stringified chain.
        match error.downcast::<sqlx::Error>() {
            Ok(db) => AppError::DatabaseError(db),
            Err(other) => AppError::InternalServerError(Some(other.to_string())),
        }
    }
}
