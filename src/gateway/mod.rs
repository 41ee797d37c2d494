//! Gateway service: the mesh entry point.
//!
//! # Data Flow
//! ```text
//! Client ──▶ /analyze ──▶ simulated pre-processing
//!                      ──▶ client.rs: POST backend /process (X-Trace-ID, 2 s deadline)
//!                      ◀── parsed body ─▶ 200 {status: analyzed, backend_response}
//!                      ◀── transport/decode failure ─▶ 503 {error: backend unavailable}
//! Client ──▶ /alert   ──▶ warn log ─▶ 200 / 400
//! ```
//!
//! # Design Decisions
//! - The gateway originates trace ids; every downstream call reuses the
//!   request's id
//! - No retries and no circuit breaking; a failed call is reported once

pub mod client;
pub mod handlers;

use axum::{routing::{get, post}, Router};

use crate::config::{DelayRange, GatewayConfig, ServerConfig};
use crate::http::HttpServer;
use crate::observability::metrics::MetricsRegistry;
use crate::observability::tracing::TracePolicy;
use crate::random::SimRng;

pub use client::{BackendClient, DownstreamError};

pub const SERVICE_NAME: &str = "gateway";

/// Application state injected into gateway handlers.
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub backend: BackendClient,
    pub rng: SimRng,
    pub work_delay: DelayRange,
}

impl GatewayState {
    pub fn new(config: &GatewayConfig, rng: SimRng) -> Result<Self, reqwest::Error> {
        Ok(Self {
            backend: BackendClient::new(&config.backend_url, config.backend_timeout())?,
            rng,
            work_delay: config.work_delay,
        })
    }
}

/// Gateway-specific routes.
pub fn routes(state: GatewayState) -> Router {
    Router::new()
        .route("/analyze", get(handlers::analyze).post(handlers::analyze))
        .route("/alert", post(handlers::alert))
        .with_state(state)
}

/// Fully wired gateway server.
pub fn server(
    config: &GatewayConfig,
    server_config: &ServerConfig,
    metrics: MetricsRegistry,
    rng: SimRng,
) -> Result<HttpServer, reqwest::Error> {
    let state = GatewayState::new(config, rng)?;
    Ok(HttpServer::new(
        SERVICE_NAME,
        routes(state),
        metrics,
        TracePolicy::Originate,
        server_config,
    ))
}
