//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (BACKEND_URL / GATEWAY_URL / LOG_DIR / HARNESS_SEED overrides)
//!     → validation.rs (semantic checks)
//!     → HarnessConfig (validated, immutable)
//!     → each role takes the section it needs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BackendConfig, ChaosConfig, DelayRange, GatewayConfig, HarnessConfig, ObservabilityConfig,
    ServerConfig, SimulationConfig, TrafficConfig,
};
pub use validation::ValidationError;
