//! Error → HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use wortschatz_core::Error;

/// Wrapper that maps domain errors onto HTTP status codes.
///
/// - `InvalidLevel` is a caller mistake: 400.
/// - `IndexNotFound` and `ModelUnavailable` mean a dependency is not
///   ready (unseeded index, missing model weights): 503.
/// - `Llm` failures come from the upstream provider: 502.
/// - Everything else is an internal failure: 500.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// The status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidLevel(_) => StatusCode::BAD_REQUEST,
            Error::IndexNotFound { .. } | Error::ModelUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Error::Llm(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("request failed: {}", self.0);
        } else {
            log::warn!("request rejected: {}", self.0);
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

// ============================================================================
// Tests
// ============================================================================
