//! Service Mesh Chaos Harness Library
//!
//! A two-tier mesh (gateway → backend) under synthetic load and randomized
//! container disruption, exercising trace propagation, metrics and failure
//! handling.

pub mod backend;
pub mod chaos;
pub mod config;
pub mod error;
pub mod gateway;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod random;
pub mod traffic;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
