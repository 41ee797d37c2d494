//! The chaos loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::chaos::action::{DisruptionAction, DisruptionKind, Target};
use crate::chaos::control_plane::{ControlPlane, ControlPlaneError};
use crate::config::ChaosConfig;
use crate::random::SimRng;

/// Periodically disrupts the gateway or the backend through a [`ControlPlane`].
///
/// Strictly sequential: an action's control-plane calls all return before the
/// next quiet period starts, so at most one action is ever in flight.
pub struct ChaosController {
    plane: Arc<dyn ControlPlane>,
    quiet_period: Duration,
    pause: Duration,
    gateway_service: String,
    backend_service: String,
    rng: SimRng,
}

impl ChaosController {
    pub fn new(plane: Arc<dyn ControlPlane>, config: &ChaosConfig, rng: SimRng) -> Self {
        Self {
            plane,
            quiet_period: config.quiet_period(),
            pause: config.stop_start_pause(),
            gateway_service: config.gateway_service.clone(),
            backend_service: config.backend_service.clone(),
            rng,
        }
    }

    /// Run until `shutdown` fires.
    ///
    /// Cancellation is only observed during the quiet period; an action that
    /// has started always runs to completion, so no service is left stopped.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            quiet_period = ?self.quiet_period,
            pause = ?self.pause,
            "Starting chaos controller"
        );

        loop {
            tokio::select! {
                _ = time::sleep(self.quiet_period) => {}
                _ = shutdown.recv() => break,
            }
            self.disrupt_once().await;
        }

        tracing::info!("Chaos controller stopped");
    }

    /// Choose one action, execute it, log the result.
    pub async fn disrupt_once(&self) -> DisruptionAction {
        let action = DisruptionAction::choose(&self.rng, self.pause);
        tracing::warn!(action = %action, "CHAOS: performing");

        match self.execute(&action).await {
            Ok(()) => tracing::warn!(action = %action, "CHAOS: completed"),
            Err(e) => tracing::error!(action = %action, error = %e, "CHAOS: control plane call failed"),
        }
        action
    }

    /// Execute `action` against the control plane.
    ///
    /// For `StopStart`, `start` is attempted even if `stop` failed; the first
    /// error is returned.
    pub async fn execute(&self, action: &DisruptionAction) -> Result<(), ControlPlaneError> {
        let service = self.service_name(action.target);
        match action.kind {
            DisruptionKind::Restart => self.plane.restart(service).await,
            DisruptionKind::StopStart { pause } => {
                let stopped = self.plane.stop(service).await;
                if let Err(e) = &stopped {
                    tracing::error!(service, error = %e, "CHAOS: stop failed, starting anyway");
                }
                time::sleep(pause).await;
                let started = self.plane.start(service).await;
                stopped.and(started)
            }
        }
    }

    fn service_name(&self, target: Target) -> &str {
        match target {
            Target::Gateway => &self.gateway_service,
            Target::Backend => &self.backend_service,
        }
    }
}
