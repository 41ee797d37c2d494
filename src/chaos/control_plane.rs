//! Container control plane: the only way the controller touches services.

use std::path::PathBuf;
use std::process::ExitStatus;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use crate::config::ChaosConfig;

#[derive(Debug, Error)]
pub enum ControlPlaneError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{verb} {service}` exited with {status}")]
    Command {
        verb: &'static str,
        service: String,
        status: ExitStatus,
    },
}

/// Restart, stop and start a named service instance.
///
/// Each call returns once the orchestrator has acted.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn restart(&self, service: &str) -> Result<(), ControlPlaneError>;
    async fn stop(&self, service: &str) -> Result<(), ControlPlaneError>;
    async fn start(&self, service: &str) -> Result<(), ControlPlaneError>;
}

/// `docker compose -f <file> <verb> <service>`.
#[derive(Debug, Clone)]
pub struct ComposeControlPlane {
    program: String,
    compose_file: PathBuf,
}

impl ComposeControlPlane {
    pub fn new(program: impl Into<String>, compose_file: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            compose_file: compose_file.into(),
        }
    }

    pub fn from_config(config: &ChaosConfig) -> Self {
        Self::new(config.compose_program.clone(), config.compose_file.clone())
    }

    fn command(&self, verb: &str, service: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("compose")
            .arg("-f")
            .arg(&self.compose_file)
            .arg(verb)
            .arg(service);
        cmd
    }

    async fn invoke(&self, verb: &'static str, service: &str) -> Result<(), ControlPlaneError> {
        let status = self
            .command(verb, service)
            .status()
            .await
            .map_err(|source| ControlPlaneError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ControlPlaneError::Command {
                verb,
                service: service.to_string(),
                status,
            })
        }
    }
}

#[async_trait]
impl ControlPlane for ComposeControlPlane {
    async fn restart(&self, service: &str) -> Result<(), ControlPlaneError> {
        self.invoke("restart", service).await
    }

    async fn stop(&self, service: &str) -> Result<(), ControlPlaneError> {
        self.invoke("stop", service).await
    }

    async fn start(&self, service: &str) -> Result<(), ControlPlaneError> {
        self.invoke("start", service).await
    }
}

/// Logs every call and touches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunControlPlane;

#[async_trait]
impl ControlPlane for DryRunControlPlane {
    async fn restart(&self, service: &str) -> Result<(), ControlPlaneError> {
        tracing::info!(service, "dry-run: restart");
        Ok(())
    }

    async fn stop(&self, service: &str) -> Result<(), ControlPlaneError> {
        tracing::info!(service, "dry-run: stop");
        Ok(())
    }

    async fn start(&self, service: &str) -> Result<(), ControlPlaneError> {
        tracing::info!(service, "dry-run: start");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_command_line() {
        let plane = ComposeControlPlane::new("docker", "infra/docker-compose.yml");
        let cmd = plane.command("stop", "backend");
        let std_cmd = cmd.as_std();
        let args: Vec<_> = std_cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(std_cmd.get_program(), "docker");
        assert_eq!(args, ["compose", "-f", "infra/docker-compose.yml", "stop", "backend"]);
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let plane = ComposeControlPlane::new("/nonexistent/mesh-harness-orchestrator", "x.yml");
        let err = plane.restart("gateway").await.unwrap_err();
        assert!(matches!(err, ControlPlaneError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_command_error() {
        // `false compose -f x.yml start backend` ignores its args and exits 1.
        let plane = ComposeControlPlane::new("false", "x.yml");
        let err = plane.start("backend").await.unwrap_err();
        assert!(matches!(err, ControlPlaneError::Command { verb: "start", .. }));
    }
}
