//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Own one Prometheus recorder per service instance
//! - Count completed requests and record their latency
//! - Render the Prometheus text exposition for `GET /metrics`
//!
//! # Metrics
//! - `request_count_total` (counter): completed requests by method, endpoint, http_status
//! - `request_latency_seconds` (histogram): latency distribution by endpoint
//!
//! # Design Decisions
//! - The recorder is never installed globally; every record goes through
//!   `metrics::with_local_recorder`, so a gateway and a backend sharing one
//!   process (as in the integration tests) keep separate books
//! - Updates are atomic inside the recorder; `export` drains pending
//!   histogram samples before rendering, so it reflects every completed update

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use thiserror::Error;

use crate::http::request::RequestRecord;

pub const REQUEST_COUNT: &str = "request_count_total";
pub const REQUEST_LATENCY: &str = "request_latency_seconds";

/// Prometheus text exposition content type.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Default buckets of the reference Prometheus client libraries.
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.010, 0.025, 0.050, 0.075, 0.100, 0.250, 0.500, 0.750, 1.000, 2.500, 5.000, 7.500,
    10.000,
];

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to configure latency buckets: {0}")]
    Buckets(#[from] BuildError),
}

/// Key of the request counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey {
    pub method: String,
    pub endpoint: String,
    pub http_status: u16,
}

/// Process-wide instrument registry for one service.
///
/// Cheap to clone; all clones share the same recorder.
#[derive(Clone)]
pub struct MetricsRegistry {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(REQUEST_LATENCY.to_string()), LATENCY_BUCKETS)?
            .build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_counter!(REQUEST_COUNT, "App Request Count");
            describe_histogram!(REQUEST_LATENCY, "Request latency");
        });

        Ok(Self {
            recorder: Arc::new(recorder),
            handle,
        })
    }

    pub fn increment(&self, key: &CounterKey) {
        metrics::with_local_recorder(self.recorder.as_ref(), || {
            counter!(REQUEST_COUNT,
                "method" => key.method.clone(),
                "endpoint" => key.endpoint.clone(),
                "http_status" => key.http_status.to_string()
            )
            .increment(1);
        });
    }

    pub fn observe(&self, endpoint: &str, latency: Duration) {
        metrics::with_local_recorder(self.recorder.as_ref(), || {
            histogram!(REQUEST_LATENCY, "endpoint" => endpoint.to_string())
                .record(latency.as_secs_f64());
        });
    }

    /// Count and time one completed request.
    pub fn record(&self, record: &RequestRecord) {
        self.increment(&CounterKey {
            method: record.method.clone(),
            endpoint: record.path.clone(),
            http_status: record.status,
        });
        self.observe(&record.path, record.latency);
    }

    /// Point-in-time snapshot in Prometheus text format.
    pub fn export(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRegistry").finish_non_exhaustive()
    }
}

/// Handler for `GET /metrics`.
pub async fn metrics_handler(State(registry): State<MetricsRegistry>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], registry.export())
}
