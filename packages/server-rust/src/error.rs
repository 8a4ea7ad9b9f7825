//! API error mapping for the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use seqalign_core::align::ComputeError;

use crate::store::JobId;

/// Errors surfaced to HTTP callers as JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Poll for a job id that was never registered.
    #[error("unknown job: {0}")]
    UnknownJob(JobId),
    /// The computation engine rejected or failed the request.
    #[error(transparent)]
    Compute(#[from] ComputeError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::UnknownJob(_) => StatusCode::NOT_FOUND,
            Self::Compute(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!("request failed: {message}");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Shorthand for handler return types.
pub type ApiResult<T> = Result<T, ApiError>;
