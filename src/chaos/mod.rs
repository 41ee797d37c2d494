//! Fault injection subsystem.
//!
//! # Data Flow
//! ```text
//! loop:
//!     sleep(quiet_period)
//!     → action.rs: uniform target {gateway, backend} × uniform kind {restart, stop_start}
//!     → controller.rs: execute synchronously
//!         → control_plane.rs: restart(service)
//!           or stop(service), sleep(pause), start(service)
//!     → log completion
//! ```
//!
//! # Design Decisions
//! - One action in flight at a time; the loop is strictly sequential
//! - No coordination with traffic or in-flight requests. Requests failing
//!   during a disruption are the signal this harness exists to produce
//! - The orchestrator sits behind the `ControlPlane` trait

pub mod action;
pub mod control_plane;
pub mod controller;

pub use action::{DisruptionAction, DisruptionKind, Target};
pub use control_plane::{ComposeControlPlane, ControlPlane, ControlPlaneError, DryRunControlPlane};
pub use controller::ChaosController;
