//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging → Initialize role → Start listener / loops
//!
//! Cancellation (shutdown.rs):
//!     trigger() → servers stop accepting, loops exit at next quiet point
//!
//! Signals (signals.rs):
//!     Ctrl-C → trigger()
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then listeners
//! - Cancellation is a hook for tests and Ctrl-C, not a drain protocol

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
