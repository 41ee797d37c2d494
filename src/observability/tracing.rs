//! Trace context propagation.
//!
//! # Responsibilities
//! - Establish one trace id per request at ingress
//! - Attach it to the request so handlers receive it as an explicit value
//! - Echo it back to the caller and hand it to downstream calls unchanged
//!
//! # Design Decisions
//! - The id is an opaque string; an inbound `X-Trace-ID` is reused verbatim
//! - Only the originating service mints ids. The gateway originates; the
//!   backend only propagates and tags header-less requests as `unknown`
//! - The context lives in request extensions, never in globals or task-locals

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Carrier header for the trace id.
pub static TRACE_HEADER: HeaderName = HeaderName::from_static("x-trace-id");

/// Id assigned by a propagating service when the caller sent none.
pub const UNKNOWN_TRACE_ID: &str = "unknown";

/// How a service establishes the trace id of a request it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracePolicy {
    /// Reuse the inbound header, otherwise mint a fresh UUID v4.
    Originate,
    /// Reuse the inbound header, otherwise use [`UNKNOWN_TRACE_ID`].
    Propagate,
}

/// Per-request trace identity. Immutable once established.
///
/// The inbound header value is kept byte for byte and is what goes downstream
/// and back to the caller. `trace_id` is its text form for bodies and logs;
/// bytes that are not UTF-8 show as U+FFFD there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    trace_id: Arc<str>,
    header: Option<HeaderValue>,
}

impl TraceContext {
    /// Fresh, globally unique id.
    pub fn mint() -> Self {
        Self::from_id(Uuid::new_v4().to_string())
    }

    /// Context for a known id. An id that cannot travel in a header is still
    /// reported in bodies and logs but not forwarded.
    pub fn from_id(id: impl Into<Arc<str>>) -> Self {
        let trace_id = id.into();
        let header = HeaderValue::from_str(&trace_id).ok();
        Self { trace_id, header }
    }

    /// Context carrying an inbound header value unchanged.
    pub fn from_header(value: &HeaderValue) -> Self {
        Self {
            trace_id: String::from_utf8_lossy(value.as_bytes()).into(),
            header: Some(value.clone()),
        }
    }

    /// Establish the context for an inbound request.
    ///
    /// Any inbound value is reused as is, whatever bytes it holds.
    pub fn at_ingress(headers: &HeaderMap, policy: TracePolicy) -> Self {
        match (headers.get(&TRACE_HEADER), policy) {
            (Some(value), _) => Self::from_header(value),
            (None, TracePolicy::Originate) => Self::mint(),
            (None, TracePolicy::Propagate) => Self::from_id(UNKNOWN_TRACE_ID),
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Header value for downstream calls and responses.
    pub fn header_value(&self) -> Option<HeaderValue> {
        self.header.clone()
    }
}

impl fmt::Display for TraceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.trace_id)
    }
}

/// Middleware establishing the [`TraceContext`] of every request.
///
/// Runs outermost so the request-record middleware and the handlers all see
/// the same context. The id is echoed in the response `X-Trace-ID` header.
pub async fn establish_trace(
    State(policy): State<TracePolicy>,
    mut request: Request,
    next: Next,
) -> Response {
    let trace = TraceContext::at_ingress(request.headers(), policy);
    request.extensions_mut().insert(trace.clone());

    let mut response = next.run(request).await;
    if let Some(value) = trace.header_value() {
        response.headers_mut().insert(TRACE_HEADER.clone(), value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_header(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TRACE_HEADER.clone(), HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_inbound_header_is_reused_verbatim() {
        for policy in [TracePolicy::Originate, TracePolicy::Propagate] {
            let ctx = TraceContext::at_ingress(&with_header("abc 123 / not-a-uuid"), policy);
            assert_eq!(ctx.trace_id(), "abc 123 / not-a-uuid");
        }
    }

    #[test]
    fn test_originate_mints_distinct_ids() {
        let a = TraceContext::at_ingress(&HeaderMap::new(), TracePolicy::Originate);
        let b = TraceContext::at_ingress(&HeaderMap::new(), TracePolicy::Originate);
        assert!(!a.trace_id().is_empty());
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.trace_id()).is_ok());
    }

    #[test]
    fn test_propagate_without_header() {
        let ctx = TraceContext::at_ingress(&HeaderMap::new(), TracePolicy::Propagate);
        assert_eq!(ctx.trace_id(), UNKNOWN_TRACE_ID);
    }

    #[test]
    fn test_non_ascii_header_is_kept_byte_for_byte() {
        let raw = HeaderValue::from_bytes(b"caf\xe9-trace").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(TRACE_HEADER.clone(), raw.clone());

        for policy in [TracePolicy::Originate, TracePolicy::Propagate] {
            let ctx = TraceContext::at_ingress(&headers, policy);
            assert_eq!(ctx.header_value().unwrap().as_bytes(), raw.as_bytes());
            assert_eq!(ctx.trace_id(), "caf\u{FFFD}-trace");
        }
    }

    #[test]
    fn test_header_value_round_trips() {
        let ctx = TraceContext::from_id("t-1");
        assert_eq!(ctx.header_value().unwrap(), "t-1");
        assert_eq!(ctx.to_string(), "t-1");
    }
}
