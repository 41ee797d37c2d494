//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::HarnessConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Downstream address of the backend, as seen by the gateway.
pub const ENV_BACKEND_URL: &str = "BACKEND_URL";
/// Published address of the gateway, as seen by the traffic generator.
pub const ENV_GATEWAY_URL: &str = "GATEWAY_URL";
/// Directory for per-service log files.
pub const ENV_LOG_DIR: &str = "LOG_DIR";
/// Seed for the simulation random source.
pub const ENV_SEED: &str = "HARNESS_SEED";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {var}: {value:?}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file (or defaults when `path` is `None`), apply environment
/// overrides from the process environment, then validate.
pub fn load_config(path: Option<&Path>) -> Result<HarnessConfig, ConfigError> {
    let config = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => HarnessConfig::default(),
    };
    finish(config, |var| std::env::var(var).ok())
}

/// Apply overrides from `lookup`, then validate.
///
/// Split out from [`load_config`] so overrides can be exercised without
/// touching the process environment.
pub fn finish(
    mut config: HarnessConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<HarnessConfig, ConfigError> {
    if let Some(url) = lookup(ENV_BACKEND_URL) {
        config.gateway.backend_url = url;
    }
    if let Some(url) = lookup(ENV_GATEWAY_URL) {
        config.traffic.gateway_url = url;
    }
    if let Some(dir) = lookup(ENV_LOG_DIR) {
        config.observability.log_dir = if dir.is_empty() { None } else { Some(dir.into()) };
    }
    if let Some(seed) = lookup(ENV_SEED) {
        let parsed = seed.parse().map_err(|_| ConfigError::Env {
            var: ENV_SEED,
            value: seed.clone(),
        })?;
        config.simulation.seed = Some(parsed);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = finish(
            HarnessConfig::default(),
            env(&[
                (ENV_BACKEND_URL, "http://127.0.0.1:9000"),
                (ENV_GATEWAY_URL, "http://127.0.0.1:9001"),
                (ENV_LOG_DIR, ""),
                (ENV_SEED, "11"),
            ]),
        )
        .unwrap();

        assert_eq!(config.gateway.backend_url, "http://127.0.0.1:9000");
        assert_eq!(config.traffic.gateway_url, "http://127.0.0.1:9001");
        assert_eq!(config.observability.log_dir, None);
        assert_eq!(config.simulation.seed, Some(11));
    }

    #[test]
    fn test_bad_seed() {
        let err = finish(HarnessConfig::default(), env(&[(ENV_SEED, "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_SEED, .. }));
    }

    #[test]
    fn test_override_is_validated() {
        let err = finish(HarnessConfig::default(), env(&[(ENV_BACKEND_URL, "backend")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
