//! Per-request accounting.
//!
//! # Responsibilities
//! - Time every request from entry to response
//! - Derive one [`RequestRecord`] per completed request, whatever the route
//! - Feed it to the metrics registry and the log sink, then drop it
//!
//! # Design Decisions
//! - Runs inside the trace middleware so the log event carries the trace id
//! - Recording happens before the response is handed back to the server, so
//!   a caller that has seen the response will find it in `/metrics`

use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::observability::metrics::MetricsRegistry;
use crate::observability::tracing::TraceContext;

/// Summary of one completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub latency: Duration,
}

/// State for [`record_request`].
#[derive(Debug, Clone)]
pub struct RecordContext {
    pub service: &'static str,
    pub metrics: MetricsRegistry,
}

pub async fn record_request(
    State(ctx): State<RecordContext>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let trace = request.extensions().get::<TraceContext>().cloned();

    let response = next.run(request).await;

    let record = RequestRecord {
        method,
        path,
        status: response.status().as_u16(),
        latency: start.elapsed(),
    };
    ctx.metrics.record(&record);

    tracing::info!(
        service = ctx.service,
        trace_id = trace.as_ref().map(TraceContext::trace_id).unwrap_or("N/A"),
        method = %record.method,
        path = %record.path,
        status = record.status,
        latency = record.latency.as_secs_f64(),
        "Request processed"
    );

    response
}
