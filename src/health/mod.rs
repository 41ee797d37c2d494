//! Service health reporting.
//!
//! Both services answer `GET /health` with a constant `{status: "ok"}`. The
//! answer is deliberately independent of chaos state and of downstream
//! reachability; it only proves the process is serving.

use axum::Json;

use crate::http::response::ServiceHealth;

pub async fn health() -> Json<ServiceHealth> {
    Json(ServiceHealth::ok())
}
