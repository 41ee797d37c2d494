//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem once per process
//! - Write to stdout and, optionally, to `<log_dir>/<service>.log`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Log level configurable via config, overridden by `RUST_LOG`
//! - Sinks are non-blocking; a sink that cannot be opened is skipped with a
//!   warning instead of failing startup

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::ObservabilityConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the background log writers alive. Dropping it flushes and stops them.
#[must_use = "logs are lost once the guard is dropped"]
pub struct LogGuard {
    _workers: Vec<WorkerGuard>,
}

/// Install the global subscriber for `service`.
///
/// Never fails: a file sink that cannot be opened is reported and skipped, and
/// a subscriber installed earlier in the process is left in place.
pub fn init_logging(config: &ObservabilityConfig, service: &str) -> LogGuard {
    let mut workers = Vec::new();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let (stdout, guard) = tracing_appender::non_blocking(std::io::stdout());
    workers.push(guard);
    layers.push(format_layer(config.json_logs, stdout));

    let mut file_error = None;
    if let Some(dir) = &config.log_dir {
        match open_log_file(dir, service) {
            Ok(appender) => {
                let (file, guard) = tracing_appender::non_blocking(appender);
                workers.push(guard);
                layers.push(format_layer(config.json_logs, file));
            }
            Err(e) => file_error = Some(e),
        }
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let installed = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .is_ok();

    if let Some(e) = file_error {
        tracing::warn!(error = %e, "Could not set up file logging, continuing on stdout");
    }
    if installed {
        tracing::debug!(service, "Logging initialized");
    }

    LogGuard { _workers: workers }
}

fn format_layer<W>(json: bool, writer: W) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    if json {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer().with_writer(writer).boxed()
    }
}

fn open_log_file(dir: &Path, service: &str) -> Result<RollingFileAppender, String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("{}: {}", dir.display(), e))?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(service)
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| e.to_string())
}
