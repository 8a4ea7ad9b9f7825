//! Alignment endpoints: immediate, artificially slow, and deferred.
//!
//! All four handlers return the same `Dispatch` type, so the deferral
//! protocol is available to any of them. Only `/delayed` uses it today:
//! submission registers the request and answers `204` with `Location` and
//! `Retry-Later` headers, and polling the returned location recomputes the
//! result from the stored request.

use axum::extract::{Path, State};
use axum::Json;
use seqalign_core::models::{AlignmentRequest, AlignmentResponse};

use super::AppState;
use crate::dispatch::Dispatch;
use crate::error::{ApiError, ApiResult};
use crate::store::JobId;

/// `POST /immediate` -- runs the computation inside the request call and
/// returns the finished result.
pub async fn immediate_handler(
    State(state): State<AppState>,
    Json(request): Json<AlignmentRequest>,
) -> ApiResult<Dispatch<Json<AlignmentResponse>>> {
    let response = state.engine.compute(&request)?;
    Ok(Dispatch::Done(Json(response)))
}

/// `POST /long` -- same contract as `/immediate` after the configured
/// artificial delay, simulating a slow computation.
///
/// The wait is a timer await, so the worker stays free to serve other
/// requests while this one sleeps.
pub async fn long_handler(
    State(state): State<AppState>,
    Json(request): Json<AlignmentRequest>,
) -> ApiResult<Dispatch<Json<AlignmentResponse>>> {
    tokio::time::sleep(state.config.delay()).await;
    let response = state.engine.compute(&request)?;
    Ok(Dispatch::Done(Json(response)))
}

/// `POST /delayed` -- registers the request and defers the computation.
///
/// Nothing is computed at submission time; the caller is redirected to the
/// job resource and told how long to wait before polling it.
pub async fn delayed_handler(
    State(state): State<AppState>,
    Json(request): Json<AlignmentRequest>,
) -> ApiResult<Dispatch<Json<AlignmentResponse>>> {
    let job_id = state.store.submit(request);
    tracing::debug!("registered deferred job {job_id}");
    Ok(Dispatch::TryLater {
        location: format!("/jobs/{job_id}"),
        wait: state.config.delay(),
    })
}

/// `GET /jobs/{job_id}` -- computes the stored request at poll time and
/// returns the result.
///
/// Polling is idempotent: the stored request is never consumed, and the
/// engine is deterministic, so every poll of the same job returns the same
/// result. Unknown ids answer `404`.
pub async fn poll_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Dispatch<Json<AlignmentResponse>>> {
    let job_id = JobId::from(job_id);
    let request = state
        .store
        .get(&job_id)
        .ok_or_else(|| ApiError::UnknownJob(job_id))?;
    let response = state.engine.compute(&request)?;
    Ok(Dispatch::Done(Json(response)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use seqalign_core::align::{Compute, ComputeError, PairwiseAligner};
    use seqalign_core::models::AlignmentMode;
    use seqalign_core::schema::SchemaTag;

    use super::*;
    use crate::config::ServiceConfig;
    use crate::store::JobStore;

    fn test_state() -> AppState {
        AppState {
            store: Arc::new(JobStore::new()),
            engine: Arc::new(PairwiseAligner::new()),
            config: Arc::new(ServiceConfig::default()),
        }
    }

    fn request(target: &str, query: &str) -> AlignmentRequest {
        AlignmentRequest {
            schema: SchemaTag::new(),
            target: target.to_owned(),
            query: query.to_owned(),
            mode: AlignmentMode::Local,
            match_score: 1.0,
            mismatch_score: 0.0,
        }
    }

    #[tokio::test]
    async fn immediate_handler_computes_in_call() {
        let state = test_state();
        let dispatch = immediate_handler(State(state), Json(request("GAACT", "GAT")))
            .await
            .unwrap();

        match dispatch {
            Dispatch::Done(Json(response)) => {
                assert!((response.score - 3.0).abs() < f64::EPSILON);
                assert_eq!(response.target, "GAACT");
            }
            Dispatch::TryLater { .. } => panic!("immediate must not defer"),
        }
    }

    #[tokio::test]
    async fn delayed_handler_registers_without_computing() {
        let state = test_state();
        let dispatch = delayed_handler(State(state.clone()), Json(request("GAACT", "GAT")))
            .await
            .unwrap();

        assert_eq!(state.store.len(), 1);
        match dispatch {
            Dispatch::TryLater { location, wait } => {
                assert!(location.starts_with("/jobs/"));
                assert_eq!(location.len(), "/jobs/".len() + 10);
                assert_eq!(wait, Duration::from_secs(5));
            }
            Dispatch::Done(_) => panic!("delayed must defer"),
        }
    }

    #[tokio::test]
    async fn poll_job_handler_recomputes_stored_request() {
        let state = test_state();
        let job_id = state.store.submit(request("GAACT", "GAT"));

        let dispatch = poll_job_handler(State(state), Path(job_id.as_str().to_owned()))
            .await
            .unwrap();
        match dispatch {
            Dispatch::Done(Json(response)) => {
                assert!((response.score - 3.0).abs() < f64::EPSILON);
            }
            Dispatch::TryLater { .. } => panic!("poll must not defer"),
        }
    }

    #[tokio::test]
    async fn poll_job_handler_rejects_unknown_id() {
        let state = test_state();
        let error = poll_job_handler(State(state), Path("nosuchjob0".to_owned()))
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::UnknownJob(id) if id.as_str() == "nosuchjob0"));
    }

    #[tokio::test(start_paused = true)]
    async fn long_handler_waits_configured_delay() {
        let state = test_state();
        let started = tokio::time::Instant::now();

        let dispatch = long_handler(State(state), Json(request("GAACT", "GAT")))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(5));
        assert!(matches!(dispatch, Dispatch::Done(_)));
    }

    #[tokio::test]
    async fn engine_failures_surface_as_compute_errors() {
        struct FailingEngine;

        impl Compute for FailingEngine {
            fn compute(
                &self,
                _request: &AlignmentRequest,
            ) -> Result<AlignmentResponse, ComputeError> {
                Err(ComputeError::Internal(anyhow::anyhow!("engine offline")))
            }
        }

        let state = AppState {
            store: Arc::new(JobStore::new()),
            engine: Arc::new(FailingEngine),
            config: Arc::new(ServiceConfig::default()),
        };

        let error = immediate_handler(State(state), Json(request("GAACT", "GAT")))
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Compute(_)));
    }
}
