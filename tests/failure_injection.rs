//! Failure injection tests for the gateway's downstream call.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde_json::{json, Value};

use mesh_harness::config::GatewayConfig;

mod common;

#[tokio::test]
async fn test_refused_connection_is_503_with_trace_id() {
    let gateway = common::spawn_gateway(common::fast_gateway(format!(
        "http://{}",
        common::refused_addr()
    )))
    .await;

    let res = common::client()
        .post(gateway.url("/analyze"))
        .header("X-Trace-ID", "s2-trace")
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "backend unavailable", "trace_id": "s2-trace"}));
}

#[tokio::test]
async fn test_stalled_backend_hits_deadline() {
    let upstream = common::start_programmable_backend(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, r#"{"status":"processed"}"#.to_string())
    })
    .await;

    let config = GatewayConfig {
        backend_timeout_ms: 300,
        ..common::fast_gateway(format!("http://{upstream}"))
    };
    let gateway = common::spawn_gateway(config).await;

    let started = Instant::now();
    let res = common::client()
        .post(gateway.url("/analyze"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(started.elapsed() < Duration::from_secs(3), "took {:?}", started.elapsed());
}

#[tokio::test]
async fn test_any_backend_status_with_json_is_200() {
    for status in [200u16, 404, 500, 502, 503] {
        let upstream = common::start_programmable_backend(move || async move {
            (status, format!(r#"{{"upstream_status":{status}}}"#))
        })
        .await;
        let gateway = common::spawn_gateway(common::fast_gateway(format!("http://{upstream}"))).await;

        let res = common::client()
            .post(gateway.url("/analyze"))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK, "backend status {status}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["backend_response"]["upstream_status"], status);
    }
}

#[tokio::test]
async fn test_undecodable_backend_body_is_503() {
    let upstream = common::start_programmable_backend(|| async {
        (200, "<html>not json</html>".to_string())
    })
    .await;
    let gateway = common::spawn_gateway(common::fast_gateway(format!("http://{upstream}"))).await;

    let res = common::client()
        .post(gateway.url("/analyze"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_exactly_one_downstream_call_per_request() {
    let calls = Arc::new(AtomicU32::new(0));
    let cc = calls.clone();
    let upstream = common::start_programmable_backend(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (503, r#"{"error":"down"}"#.to_string())
        }
    })
    .await;
    let gateway = common::spawn_gateway(common::fast_gateway(format!("http://{upstream}"))).await;
    let client = common::client();

    for _ in 0..5 {
        let res = client.post(gateway.url("/analyze")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 5, "no retries expected");
}

#[tokio::test]
async fn test_backend_recovers_after_outage() {
    let backend_addr = common::refused_addr();
    let gateway = common::spawn_gateway(common::fast_gateway(format!("http://{backend_addr}"))).await;
    let client = common::client();

    let down = client.post(gateway.url("/analyze")).send().await.unwrap();
    assert_eq!(down.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Bring a backend up on the same address, as a restarted container would.
    let listener = tokio::net::TcpListener::bind(backend_addr).await.unwrap();
    let metrics = mesh_harness::observability::MetricsRegistry::new().unwrap();
    let server = mesh_harness::backend::server(
        &common::fast_backend(0.0),
        &Default::default(),
        metrics,
        mesh_harness::random::SimRng::seeded(1),
    );
    let shutdown = mesh_harness::Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    let up = client.post(gateway.url("/analyze")).send().await.unwrap();
    assert_eq!(up.status(), StatusCode::OK);

    shutdown.trigger();
}
