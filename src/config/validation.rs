//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (delays ordered, probabilities in [0, 1])
//! - Check that addresses and URLs are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HarnessConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{DelayRange, HarnessConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: min_ms ({min}) is greater than max_ms ({max})")]
    InvertedRange { field: &'static str, min: u64, max: u64 },

    #[error("{field}: {value} is not a probability in [0, 1]")]
    Probability { field: &'static str, value: f64 },

    #[error("{field}: invalid URL {value:?}: {reason}")]
    Url {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: invalid socket address {value:?}")]
    BindAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: must not be empty")]
    Empty { field: &'static str },
}

/// Check every semantic rule, collecting all failures.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_bind(&mut errors, "gateway.bind_address", &config.gateway.bind_address);
    check_bind(&mut errors, "backend.bind_address", &config.backend.bind_address);

    check_url(&mut errors, "gateway.backend_url", &config.gateway.backend_url);
    check_url(&mut errors, "traffic.gateway_url", &config.traffic.gateway_url);

    check_range(&mut errors, "gateway.work_delay", &config.gateway.work_delay);
    check_range(&mut errors, "backend.work_delay", &config.backend.work_delay);
    check_range(&mut errors, "traffic.interval", &config.traffic.interval);

    let rate = config.backend.failure_rate;
    if !(rate.is_finite() && (0.0..=1.0).contains(&rate)) {
        errors.push(ValidationError::Probability {
            field: "backend.failure_rate",
            value: rate,
        });
    }

    check_nonzero(&mut errors, "gateway.backend_timeout_ms", config.gateway.backend_timeout_ms);
    check_nonzero(&mut errors, "traffic.request_timeout_ms", config.traffic.request_timeout_ms);
    check_nonzero(&mut errors, "server.request_timeout_secs", config.server.request_timeout_secs);

    check_nonempty(&mut errors, "chaos.compose_program", &config.chaos.compose_program);
    check_nonempty(&mut errors, "chaos.gateway_service", &config.chaos.gateway_service);
    check_nonempty(&mut errors, "chaos.backend_service", &config.chaos.backend_service);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_bind(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let reason = match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => return,
        Ok(url) => format!("unsupported scheme {:?}", url.scheme()),
        Err(e) => e.to_string(),
    };
    errors.push(ValidationError::Url {
        field,
        value: value.to_string(),
        reason,
    });
}

fn check_range(errors: &mut Vec<ValidationError>, field: &'static str, range: &DelayRange) {
    if range.min_ms > range.max_ms {
        errors.push(ValidationError::InvertedRange {
            field,
            min: range.min_ms,
            max: range.max_ms,
        });
    }
}

fn check_nonzero(errors: &mut Vec<ValidationError>, field: &'static str, value: u64) {
    if value == 0 {
        errors.push(ValidationError::Zero { field });
    }
}

fn check_nonempty(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty { field });
    }
}
