use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;
use validator::ValidationErrors;

use crate::dto::scores::ErrorResponse;

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided by the client.
    #[error("{0}")]
    InvalidInput(String),
    /// Scores do not add up to zero.
    #[error("Invalid scores! Sum must equal 0. Current sum: {sum}")]
    UnbalancedScores {
        /// Actual sum of the submitted scores.
        sum: i128,
    },
    /// Something failed outside of the sinks' own error handling.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// Internal server error; the message is shown to clients as-is.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Convert a service error, hiding internal details behind `public_message`.
    pub fn from_service(err: ServiceError, public_message: &str) -> Self {
        match err {
            ServiceError::Internal(_) => AppError::Internal(public_message.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .into_values()
            .flatten()
            .find_map(|error| error.message.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| format!("validation failed: {err}"));
        AppError::BadRequest(message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorResponse {
            success: false,
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
