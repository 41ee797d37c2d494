//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the harness.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the mesh harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// Gateway service settings.
    pub gateway: GatewayConfig,

    /// Backend service settings.
    pub backend: BackendConfig,

    /// Synthetic load settings.
    pub traffic: TrafficConfig,

    /// Fault injection settings.
    pub chaos: ChaosConfig,

    /// Settings shared by both HTTP services.
    pub server: ServerConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Random source settings.
    pub simulation: SimulationConfig,
}

/// Inclusive millisecond range used for simulated delays.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that always yields zero. Handy in tests.
    pub const fn none() -> Self {
        Self::new(0, 0)
    }
}

/// Gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Base URL of the backend service.
    pub backend_url: String,

    /// Deadline for the downstream `/process` call, in milliseconds.
    pub backend_timeout_ms: u64,

    /// Simulated pre-processing cost for `/analyze`.
    pub work_delay: DelayRange,
}

impl GatewayConfig {
    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_timeout_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            backend_url: "http://backend:5000".to_string(),
            backend_timeout_ms: 2_000,
            work_delay: DelayRange::new(10, 50),
        }
    }
}

/// Backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Simulated processing cost for `/process`.
    pub work_delay: DelayRange,

    /// Probability that a `/process` call fails (0.0 - 1.0).
    pub failure_rate: f64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            work_delay: DelayRange::new(100, 500),
            failure_rate: 0.1,
        }
    }
}

/// Traffic generator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Published address of the gateway.
    pub gateway_url: String,

    /// Pause between consecutive requests.
    pub interval: DelayRange,

    /// Per-request deadline in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:5001".to_string(),
            interval: DelayRange::new(100, 1_000),
            request_timeout_ms: 10_000,
        }
    }
}

/// Chaos controller configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChaosConfig {
    /// Quiet period before each disruption, in milliseconds.
    pub quiet_period_ms: u64,

    /// Pause between `stop` and `start`, in milliseconds.
    pub stop_start_pause_ms: u64,

    /// Orchestrator executable.
    pub compose_program: String,

    /// Compose file passed with `-f`.
    pub compose_file: PathBuf,

    /// Service name of the gateway in the compose file.
    pub gateway_service: String,

    /// Service name of the backend in the compose file.
    pub backend_service: String,
}

impl ChaosConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    pub fn stop_start_pause(&self) -> Duration {
        Duration::from_millis(self.stop_start_pause_ms)
    }
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: 30_000,
            stop_start_pause_ms: 5_000,
            compose_program: "docker".to_string(),
            compose_file: PathBuf::from("infra/docker-compose.yml"),
            gateway_service: "gateway".to_string(),
            backend_service: "backend".to_string(),
        }
    }
}

/// HTTP server settings shared by both services.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON lines instead of the human-readable format.
    pub json_logs: bool,

    /// Directory for the per-service log file. `None` disables file output.
    pub log_dir: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
            log_dir: Some(PathBuf::from("/var/log/app")),
        }
    }
}

/// Random source configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
}
