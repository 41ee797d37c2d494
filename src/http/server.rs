//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router for one service (its own routes + `/health` + `/metrics`)
//! - Wire up middleware (HTTP spans, trace ingress, request records, timeout)
//! - Serve on a bound listener until the cancellation hook fires

use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::health::health;
use crate::http::request::{record_request, RecordContext};
use crate::observability::metrics::{metrics_handler, MetricsRegistry};
use crate::observability::tracing::{establish_trace, TracePolicy};

/// HTTP server for one mesh service.
pub struct HttpServer {
    service: &'static str,
    router: Router,
}

impl HttpServer {
    /// Wrap a service's own routes with the shared endpoints and middleware.
    pub fn new(
        service: &'static str,
        routes: Router,
        metrics: MetricsRegistry,
        policy: TracePolicy,
        config: &ServerConfig,
    ) -> Self {
        let router = Self::build_router(service, routes, metrics, policy, config);
        Self { service, router }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost-last: HTTP span → trace ingress → request record
    /// → timeout → handler. The timeout sits inside the record layer so a
    /// timed-out request is still counted.
    #[allow(deprecated)]
    fn build_router(
        service: &'static str,
        routes: Router,
        metrics: MetricsRegistry,
        policy: TracePolicy,
        config: &ServerConfig,
    ) -> Router {
        let shared = Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics_handler))
            .with_state(metrics.clone());

        let record = RecordContext { service, metrics };

        shared
            .merge(routes)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(middleware::from_fn_with_state(record, record_request))
            .layer(middleware::from_fn_with_state(policy, establish_trace))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once `shutdown` fires. There is no drain guarantee beyond what
    /// Axum's graceful shutdown gives in-flight connections.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            service = self.service,
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!(service = self.service, "HTTP server stopped");
        Ok(())
    }
}
