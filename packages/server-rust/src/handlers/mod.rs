//! HTTP handler definitions for the alignment service.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod align;
pub mod health;

pub use align::{delayed_handler, immediate_handler, long_handler, poll_job_handler};
pub use health::healtz_handler;

use std::sync::Arc;

use seqalign_core::align::Compute;

use crate::config::ServiceConfig;
use crate::store::JobStore;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Registry of pending deferred jobs.
    pub store: Arc<JobStore>,
    /// Computation engine behind the `Compute` seam.
    pub engine: Arc<dyn Compute>,
    /// Service configuration (delay, version, limits).
    pub config: Arc<ServiceConfig>,
}
