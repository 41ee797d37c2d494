//! Response bodies shared by both services.
//!
//! Every body that carries a trace id carries the id established for the
//! request that produced it.

use serde::Serialize;
use serde_json::Value;

/// `{status: "ok"}` from `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
}

impl ServiceHealth {
    pub const fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Gateway `/analyze` success, embedding whatever the backend answered.
#[derive(Debug, Clone, Serialize)]
pub struct Analyzed {
    pub status: &'static str,
    pub trace_id: String,
    pub backend_response: Value,
}

/// Backend `/process` success.
#[derive(Debug, Clone, Serialize)]
pub struct Processed {
    pub status: &'static str,
    pub trace_id: String,
    /// Simulated work actually performed, in seconds.
    pub duration: f64,
}

/// Error body with the request's trace id.
#[derive(Debug, Clone, Serialize)]
pub struct TracedError {
    pub error: &'static str,
    pub trace_id: String,
}

/// Bare `{status}` acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub status: &'static str,
}
