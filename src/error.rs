//! Top-level error type for starting and running a role.

use thiserror::Error;

use crate::config::ConfigError;
use crate::observability::MetricsError;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("metrics: {0}")]
    Metrics(#[from] MetricsError),

    #[error("HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
