//! Traffic generation subsystem.
//!
//! # Data Flow
//! ```text
//! loop:
//!     generator.rs → POST {gateway_url}/analyze
//!                  → log status or error
//!                  → sleep uniform(interval)
//! ```
//!
//! # Design Decisions
//! - Independent task sharing nothing with the services but the network
//! - No backoff, no circuit breaking; consecutive failures change nothing

pub mod generator;

pub use generator::TrafficGenerator;
