//! Downstream client for the backend's `/process` endpoint.

use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;

use crate::observability::tracing::{TraceContext, TRACE_HEADER};

/// Why a downstream call produced no usable body.
///
/// The gateway reports both variants as "backend unavailable"; the split only
/// sharpens the log line.
#[derive(Debug, Error)]
pub enum DownstreamError {
    /// Connection refused, DNS failure, timeout or any other transport fault.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered but the body could not be read or parsed as JSON.
    #[error("undecodable response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// HTTP client bound to one backend base URL with a fixed deadline.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    process_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            process_url: format!("{}/process", base_url.trim_end_matches('/')),
        })
    }

    pub fn process_url(&self) -> &str {
        &self.process_url
    }

    /// Exactly one `POST /process` carrying the caller's trace id.
    ///
    /// Any HTTP status counts as a completed call; only the parsed body is
    /// returned. The deadline covers connect, send and body read.
    pub async fn process(&self, trace: &TraceContext) -> Result<Value, DownstreamError> {
        let mut request = self
            .client
            .post(&self.process_url)
            .json(&json!({ "data": "sample" }));
        if let Some(value) = trace.header_value() {
            request = request.header(TRACE_HEADER.clone(), value);
        }

        let response = request.send().await.map_err(DownstreamError::Transport)?;
        let status = response.status();
        let body = response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                DownstreamError::Transport(e)
            } else {
                DownstreamError::Decode(e)
            }
        })?;

        tracing::debug!(trace_id = %trace, status = %status, "Backend responded");
        Ok(body)
    }
}
