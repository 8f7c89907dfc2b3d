//! Error types for the dashboard API layer.
//!
//! [`ApiError`] converts into an Axum HTTP response with a
//! `{error, status}` JSON body. Every variant is a client mistake and maps
//! to 400; collaborator failures never reach this layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use rescue_core::CoreError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The named entity does not exist. Reported as 400, like any other
    /// bad command target.
    #[error("{0}")]
    NotFound(String),

    /// The request body or path could not be understood.
    #[error("{0}")]
    InvalidRequest(String),
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::NotFound(msg) => Self::NotFound(msg),
        }
    }
}

impl ApiError {
    /// HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_bad_request() {
        let error = ApiError::from(CoreError::NotFound("Route not found".to_owned()));
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "Route not found");
    }

    #[test]
    fn invalid_request_is_bad_request() {
        let error = ApiError::InvalidRequest("terms are not valid JSON".to_owned());
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }
}
