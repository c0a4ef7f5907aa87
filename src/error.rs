use actix_web::{http::StatusCode, HttpResponse, ResponseError};
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

    /// The caller's account has no employee profile attached. Kept separate
    /// from `Forbidden` because it signals a data-setup problem, not a
    /// permissions violation.
    #[error("No employee profile is linked to this account")]
    ProfileNotLinked,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

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
            AppError::ProfileNotLinked => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        log::error!(
            "Request failed with status {}: {}",
            status_code,
            error_message
        );

        let response_body = ApiResponse::<()>::error(&error_message);

        HttpResponse::build(status_code).json(response_body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> Self {
        log::error!("Password hashing error: {}", error);
        AppError::InternalServerError(None)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        log::error!("Token error: {}", error);
        AppError::Unauthorized
    }
}

impl AppError {
    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }

    /// True when the underlying storage error is a unique-constraint
    /// violation, i.e. the losing side of an insert race.
    pub fn is_unique_violation(error: &sqlx::Error) -> bool {
        matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);

        if error.is::<sqlx::Error>() {
            match error.downcast::<sqlx::Error>() {
                Ok(sqlx_err) => return AppError::DatabaseError(sqlx_err),
                Err(original_error) => {
                    return AppError::InternalServerError(Some(original_error.to_string()));
                }
            }
        }

        AppError::InternalServerError(Some(error.to_string()))
    }
}
