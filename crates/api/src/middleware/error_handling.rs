//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the scheduling API.
//! It maps domain errors to HTTP status codes and JSON error bodies of the form
//! `{"code": "...", "error": "..."}`, so every endpoint fails the same way.
//!
//! Extractor rejections (malformed JSON, a non-numeric path id, a bad query string)
//! are folded into [`SchedulingError::InvalidInput`] instead of axum's plain-text
//! defaults.

use axum::{
    BoxError, Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scheduling_core::errors::{AuthError, SchedulingError};
use serde_json::json;
use tower::timeout::error::Elapsed;
use tracing::{error, warn};

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use scheduling_api::middleware::error_handling::AppError;
/// use scheduling_core::errors::SchedulingError;
///
/// async fn handler(id: i64) -> Result<Json<i64>, AppError> {
///     if id <= 0 {
///         return Err(AppError(SchedulingError::InvalidInput(
///             "id must be positive".to_string(),
///         )));
///     }
///     Ok(Json(id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub SchedulingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SchedulingError::InvalidInput(_) | SchedulingError::InvalidTimeRange(_) => {
                StatusCode::BAD_REQUEST
            }
            SchedulingError::TimeSlotTaken(_) | SchedulingError::TimetableInUse(_) => {
                StatusCode::CONFLICT
            }
            SchedulingError::NotFound(_) => StatusCode::NOT_FOUND,
            SchedulingError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            SchedulingError::Forbidden(_) => StatusCode::FORBIDDEN,
            SchedulingError::StoreUnavailable(_) | SchedulingError::IdentityUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            SchedulingError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            SchedulingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            if self.0.is_retryable() {
                warn!(
                    code = self.0.code(),
                    error = ?self.0,
                    "Request failed with a retryable error"
                );
            } else {
                error!(code = self.0.code(), error = ?self.0, "Request failed");
            }
        }

        let body = Json(json!({
            "code": self.0.code(),
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        AppError(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(SchedulingError::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(SchedulingError::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(SchedulingError::InvalidInput(rejection.body_text()))
    }
}

/// Turns a failure from the request timeout layer into the standard error body.
pub async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        warn!("Request exceeded the configured timeout");
        AppError(SchedulingError::RequestTimeout(err.to_string()))
    } else {
        AppError(SchedulingError::Internal(err))
    }
}

/// Maps a SchedulingError to an HTTP response
pub fn map_error(err: SchedulingError) -> Response {
    AppError(err).into_response()
}
