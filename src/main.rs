//! Service Mesh Chaos Harness
//!
//! One binary, three roles:
//!
//! ```text
//!                 ┌──────────────────┐          ┌──────────────────┐
//!   traffic ────▶ │     gateway      │ ───────▶ │     backend      │
//!   generator     │ /analyze /alert  │ X-Trace- │ /process         │
//!      ▲          │ /health /metrics │    ID    │ /health /metrics │
//!      │          └────────▲─────────┘          └────────▲─────────┘
//!      │                   │  restart / stop / start      │
//!   mesh-harness chaos ────┴──── chaos controller ────────┘
//! ```
//!
//! `mesh-harness gateway` and `mesh-harness backend` each serve one tier;
//! `mesh-harness chaos` drives load into the gateway while disrupting both
//! tiers through the container control plane.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use mesh_harness::config::load_config;
use mesh_harness::lifecycle::signals::forward_ctrl_c;
use mesh_harness::lifecycle::startup::{run_backend, run_chaos, run_gateway, ChaosOptions};
use mesh_harness::observability::init_logging;
use mesh_harness::Shutdown;

#[derive(Parser)]
#[command(name = "mesh-harness")]
#[command(about = "Two-tier service mesh under load and chaos", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "HARNESS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    role: Role,
}

#[derive(Subcommand)]
enum Role {
    /// Serve the gateway tier
    Gateway,
    /// Serve the backend tier
    Backend,
    /// Generate traffic and disrupt services
    Chaos {
        /// Log control-plane calls instead of running the orchestrator
        #[arg(long)]
        dry_run: bool,
        /// Disrupt only, without background traffic
        #[arg(long)]
        no_traffic: bool,
    },
}

impl Role {
    fn name(&self) -> &'static str {
        match self {
            Role::Gateway => "gateway",
            Role::Backend => "backend",
            Role::Chaos { .. } => "chaos",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("mesh-harness: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging(&config.observability, cli.role.name());
    tracing::info!(role = cli.role.name(), "mesh-harness v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Arc::new(Shutdown::new());
    forward_ctrl_c(shutdown.clone());

    let result = match cli.role {
        Role::Gateway => run_gateway(&config, &shutdown).await,
        Role::Backend => run_backend(&config, &shutdown).await,
        Role::Chaos {
            dry_run,
            no_traffic,
        } => {
            let options = ChaosOptions {
                dry_run,
                no_traffic,
            };
            run_chaos(&config, options, &shutdown).await
        }
    };

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
