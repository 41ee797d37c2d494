//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request ingress:
//!     → tracing.rs (establish TraceContext, attach to request)
//!     → handler (receives TraceContext explicitly, forwards it downstream)
//!     → http/request.rs (RequestRecord)
//!         → metrics.rs (counter + histogram)
//!         → logging.rs sinks (structured "Request processed" event)
//!
//! Consumers:
//!     → Log aggregation (stdout, file)
//!     → Metrics endpoint (Prometheus scrape of GET /metrics)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Trace ID flows through every hop and every log event of a request
//! - Metrics are cheap (atomic increments) and per service instance

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::logging::{init_logging, LogGuard};
pub use self::metrics::{MetricsError, MetricsRegistry};
pub use self::tracing::{TraceContext, TracePolicy, TRACE_HEADER};
