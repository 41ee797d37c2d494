//! Startup orchestration, one entry point per role.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order: random source, metrics, server, listener
//! - Background loops are spawned before the foreground task starts

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::backend;
use crate::chaos::{ChaosController, ComposeControlPlane, ControlPlane, DryRunControlPlane};
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::gateway;
use crate::lifecycle::Shutdown;
use crate::observability::MetricsRegistry;
use crate::random::SimRng;
use crate::traffic::TrafficGenerator;

pub async fn run_gateway(config: &HarnessConfig, shutdown: &Shutdown) -> Result<(), HarnessError> {
    let rng = SimRng::from_seed(config.simulation.seed);
    let metrics = MetricsRegistry::new()?;
    let server = gateway::server(&config.gateway, &config.server, metrics, rng)?;

    tracing::info!(
        bind_address = %config.gateway.bind_address,
        backend_url = %config.gateway.backend_url,
        backend_timeout_ms = config.gateway.backend_timeout_ms,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.gateway.bind_address).await?;
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}

pub async fn run_backend(config: &HarnessConfig, shutdown: &Shutdown) -> Result<(), HarnessError> {
    let rng = SimRng::from_seed(config.simulation.seed);
    let metrics = MetricsRegistry::new()?;
    let server = backend::server(&config.backend, &config.server, metrics, rng);

    tracing::info!(
        bind_address = %config.backend.bind_address,
        failure_rate = config.backend.failure_rate,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.backend.bind_address).await?;
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}

/// Options for the chaos role.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaosOptions {
    /// Log control-plane calls instead of running the orchestrator.
    pub dry_run: bool,
    /// Skip the background traffic generator.
    pub no_traffic: bool,
}

/// Traffic in the background, chaos in the foreground.
pub async fn run_chaos(
    config: &HarnessConfig,
    options: ChaosOptions,
    shutdown: &Shutdown,
) -> Result<(), HarnessError> {
    // Separate streams so the traffic pacing does not shift chaos picks.
    let seed = config.simulation.seed;
    let traffic_rng = SimRng::from_seed(seed);
    let chaos_rng = SimRng::from_seed(seed.map(|s| s.wrapping_add(1)));

    if !options.no_traffic {
        let generator = TrafficGenerator::new(&config.traffic, traffic_rng)?;
        tokio::spawn(generator.run(shutdown.subscribe()));
    }

    let plane: Arc<dyn ControlPlane> = if options.dry_run {
        Arc::new(DryRunControlPlane)
    } else {
        Arc::new(ComposeControlPlane::from_config(&config.chaos))
    };

    ChaosController::new(plane, &config.chaos, chaos_rng)
        .run(shutdown.subscribe())
        .await;
    Ok(())
}
