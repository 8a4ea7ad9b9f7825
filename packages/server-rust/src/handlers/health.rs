//! Readiness endpoint handler.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use super::AppState;

/// `GET /_healtz` -- readiness probe for the deployment platform.
///
/// Always returns 200 with the running version. The platform only checks
/// the status code; the version in the body is for operators reading probe
/// logs.
pub async fn healtz_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "version": state.config.version }))
}
