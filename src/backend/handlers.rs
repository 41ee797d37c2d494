use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::backend::BackendState;
use crate::http::response::{Processed, TracedError};
use crate::observability::tracing::TraceContext;

/// `POST /process`: simulated work, failing with probability `failure_rate`.
pub async fn process(
    State(state): State<BackendState>,
    Extension(trace): Extension<TraceContext>,
) -> Response {
    let outcome = state.simulator.next_outcome();
    tokio::time::sleep(outcome.delay).await;

    if outcome.failed {
        tracing::error!(trace_id = %trace, "Random processing error occurred");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(TracedError {
                error: "processing failed",
                trace_id: trace.trace_id().to_string(),
            }),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(Processed {
            status: "processed",
            trace_id: trace.trace_id().to_string(),
            duration: outcome.delay.as_secs_f64(),
        }),
    )
        .into_response()
}
