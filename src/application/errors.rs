use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::domain::{RepositoryError, ScanError};

/// Application-level errors, independent of transport.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound,
            RepositoryError::Conflict(msg) => AppError::Conflict(msg),
            RepositoryError::Unexpected(msg) => AppError::Unexpected(msg),
        }
    }
}

/// JSON body returned for every API error.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Wrapper rendering an [`AppError`] as an HTTP response.
#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        Self(AppError::Scan(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            AppError::NotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Scan(err) => (scan_status(err), err.to_string()),
            AppError::Unexpected(msg) => {
                error!(error = %msg, "unexpected error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Every pipeline error kind maps to its own status class so callers can tell
/// provider trouble from bad input from store trouble.
fn scan_status(err: &ScanError) -> StatusCode {
    match err {
        ScanError::Transport(_)
        | ScanError::Provider(_)
        | ScanError::EmptyResult
        | ScanError::MalformedResponse => StatusCode::BAD_GATEWAY,
        ScanError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScanError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
