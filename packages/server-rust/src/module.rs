//! Service module with deferred startup lifecycle.
//!
//! Implements the deferred startup pattern: `new()` creates resources,
//! `start()` binds the TCP listener, and `serve()` starts accepting
//! connections. This separation lets the binary log the bound port (and
//! lets tests pick an OS-assigned one) before traffic is accepted.

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use seqalign_core::align::Compute;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServiceConfig;
use crate::handlers::{
    delayed_handler, healtz_handler, immediate_handler, long_handler, poll_job_handler, AppState,
};
use crate::middleware::build_http_layers;
use crate::store::JobStore;

/// Manages the full HTTP server lifecycle.
///
/// Follows the deferred startup pattern:
/// 1. `new()` -- allocates shared state (job store, engine handle)
/// 2. `start()` -- binds the TCP listener to the configured address
/// 3. `serve()` -- accepts connections until the shutdown future resolves
pub struct ServiceModule {
    config: ServiceConfig,
    listener: Option<TcpListener>,
    state: AppState,
}

impl ServiceModule {
    /// Creates a new service module without binding any port.
    ///
    /// The job store is allocated immediately and owned by this module's
    /// state; the engine is injected so callers can swap implementations.
    #[must_use]
    pub fn new(config: ServiceConfig, engine: Arc<dyn Compute>) -> Self {
        let state = AppState {
            store: Arc::new(JobStore::new()),
            engine,
            config: Arc::new(config.clone()),
        };
        Self {
            config,
            listener: None,
            state,
        }
    }

    /// Returns a shared reference to the job store.
    #[must_use]
    pub fn job_store(&self) -> Arc<JobStore> {
        Arc::clone(&self.state.store)
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `POST /immediate` -- compute inside the request call
    /// - `POST /long` -- compute after the configured artificial delay
    /// - `POST /delayed` -- register a job, answer 204 with poll headers
    /// - `GET /jobs/{job_id}` -- compute a registered job at poll time
    /// - `GET /_healtz` -- readiness probe with version
    #[must_use]
    pub fn build_router(&self) -> Router {
        assemble_router(self.state.clone(), &self.config)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Starts serving connections until the shutdown future resolves.
    ///
    /// Consumes `self` because the listener is moved into the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server encounters a fatal I/O error.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called before `serve()`.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .expect("start() must be called before serve()");
        let router = assemble_router(self.state, &self.config);

        info!("Serving HTTP connections");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

fn assemble_router(state: AppState, config: &ServiceConfig) -> Router {
    let layers = build_http_layers(config);

    Router::new()
        .route("/immediate", post(immediate_handler))
        .route("/long", post(long_handler))
        .route("/delayed", post(delayed_handler))
        .route("/jobs/{job_id}", get(poll_job_handler))
        .route("/_healtz", get(healtz_handler))
        .layer(layers)
        .with_state(state)
}
