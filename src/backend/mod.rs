//! Backend service: the terminal request processor.
//!
//! # Data Flow
//! ```text
//! Gateway ──▶ /process ──▶ simulation.rs (delay + Bernoulli failure)
//!                       ──▶ 200 {status: processed, trace_id, duration}
//!                       ──▶ 500 {error: processing failed, trace_id}
//! ```
//!
//! # Design Decisions
//! - The backend never originates trace ids; a header-less call is tagged `unknown`
//! - Randomness comes from an injected `SimRng` so failure sequences replay exactly

pub mod handlers;
pub mod simulation;

use axum::{routing::post, Router};

use crate::config::{BackendConfig, ServerConfig};
use crate::http::HttpServer;
use crate::observability::metrics::MetricsRegistry;
use crate::observability::tracing::TracePolicy;
use crate::random::SimRng;

pub use simulation::{ProcessOutcome, ProcessSimulator};

pub const SERVICE_NAME: &str = "backend";

/// Application state injected into backend handlers.
#[derive(Debug, Clone)]
pub struct BackendState {
    pub simulator: ProcessSimulator,
}

/// Backend-specific routes.
pub fn routes(state: BackendState) -> Router {
    Router::new()
        .route("/process", post(handlers::process))
        .with_state(state)
}

/// Fully wired backend server.
pub fn server(
    config: &BackendConfig,
    server_config: &ServerConfig,
    metrics: MetricsRegistry,
    rng: SimRng,
) -> HttpServer {
    let state = BackendState {
        simulator: ProcessSimulator::from_config(config, rng),
    };
    HttpServer::new(
        SERVICE_NAME,
        routes(state),
        metrics,
        TracePolicy::Propagate,
        server_config,
    )
}
