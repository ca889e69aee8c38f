use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use super::error_payload::ErrorPayload;
use crate::utils::api_errors::ApiError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AppError {
    pub fn code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Api(e) => e.code(),
        }
    }

    fn error_type(&self) -> String {
        match self {
            AppError::NotFound(_) => "NOT_FOUND".to_string(),
            AppError::Api(e) => e.kind().replace('-', "_").to_uppercase(),
        }
    }

    fn message(&self) -> String {
        match self {
            // Backend details stay in the logs.
            AppError::Api(e) if !e.is_expected() => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let error_response = ErrorPayload {
            message: self.message(),
            code: status.as_u16(),
            r#type: self.error_type(),
            details: None,
        };

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_their_status_and_type() {
        let err = AppError::from(ApiError::AlreadyFollowing);
        assert_eq!(err.code(), StatusCode::CONFLICT);
        assert_eq!(err.error_type(), "ALREADY_FOLLOWING");
        assert_eq!(err.message(), "[[error:already-following]]");
    }

    #[test]
    fn backend_errors_hide_details() {
        let err = AppError::from(ApiError::InternalError("pool timed out".to_string()));
        assert_eq!(err.code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
    }
}
