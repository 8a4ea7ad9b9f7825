//! Handler dispatch outcomes, including the deferral signal.
//!
//! Deferral is an ordinary return value, not an error: a handler that wants
//! the caller to come back later returns [`Dispatch::TryLater`] and the
//! shared `IntoResponse` impl renders the protocol (`204 No Content` plus
//! `Location` and `Retry-Later` headers). Any handler can defer without
//! touching response plumbing.

use std::time::Duration;

use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};

/// Non-standard header carrying the suggested poll wait, in whole seconds.
pub const RETRY_LATER: HeaderName = HeaderName::from_static("retry-later");

/// Outcome of a computation handler.
#[derive(Debug)]
pub enum Dispatch<T> {
    /// The computation finished; respond with the payload.
    Done(T),
    /// The result is not ready; poll `location` after `wait`.
    TryLater {
        /// Path at which the result can later be retrieved.
        location: String,
        /// Suggested wait before polling. Rendered as whole seconds.
        wait: Duration,
    },
}

impl<T: IntoResponse> IntoResponse for Dispatch<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Done(payload) => payload.into_response(),
            Self::TryLater { location, wait } => (
                StatusCode::NO_CONTENT,
                [
                    (header::LOCATION, location),
                    (RETRY_LATER, wait.as_secs().to_string()),
                ],
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::Json;

    use super::*;

    #[tokio::test]
    async fn done_renders_inner_payload() {
        let dispatch = Dispatch::Done(Json(serde_json::json!({ "score": 3.0 })));
        let response = dispatch.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["score"], 3.0);
    }

    #[tokio::test]
    async fn try_later_renders_no_content_with_headers() {
        let dispatch: Dispatch<Json<serde_json::Value>> = Dispatch::TryLater {
            location: "/jobs/abcdefghij".to_owned(),
            wait: Duration::from_secs(5),
        };
        let response = dispatch.into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/jobs/abcdefghij"
        );
        assert_eq!(response.headers().get(RETRY_LATER).unwrap(), "5");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn try_later_wait_is_whole_seconds() {
        let dispatch: Dispatch<Json<serde_json::Value>> = Dispatch::TryLater {
            location: "/jobs/abcdefghij".to_owned(),
            wait: Duration::from_millis(2_600),
        };
        let response = dispatch.into_response();
        assert_eq!(response.headers().get(RETRY_LATER).unwrap(), "2");
    }
}
