use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::Value;

use crate::gateway::GatewayState;
use crate::http::response::{Ack, Analyzed, TracedError};
use crate::observability::tracing::TraceContext;

/// `GET|POST /analyze`.
///
/// A backend that answers at all, even with a 500 and an error body, yields
/// a 200 here with that body embedded. Only a backend that cannot be reached
/// (or whose answer cannot be decoded) yields a 503.
pub async fn analyze(
    State(state): State<GatewayState>,
    Extension(trace): Extension<TraceContext>,
) -> Response {
    let work = state.rng.delay_in(&state.work_delay);
    tokio::time::sleep(work).await;

    match state.backend.process(&trace).await {
        Ok(backend_response) => (
            StatusCode::OK,
            Json(Analyzed {
                status: "analyzed",
                trace_id: trace.trace_id().to_string(),
                backend_response,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(trace_id = %trace, error = %e, "Failed to call backend");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(TracedError {
                    error: "backend unavailable",
                    trace_id: trace.trace_id().to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// `POST /alert`: log any JSON payload at warning level.
pub async fn alert(Extension(trace): Extension<TraceContext>, body: Bytes) -> Response {
    match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => {
            tracing::warn!(trace_id = %trace, alert = %payload, "ALERT RECEIVED");
            (StatusCode::OK, Json(Ack { status: "alert_received" })).into_response()
        }
        Err(e) => {
            tracing::error!(trace_id = %trace, error = %e, "Failed to process alert");
            (StatusCode::BAD_REQUEST, Json(Ack { status: "error" })).into_response()
        }
    }
}
