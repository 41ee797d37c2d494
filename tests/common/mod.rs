//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use mesh_harness::backend;
use mesh_harness::config::{BackendConfig, DelayRange, GatewayConfig, ServerConfig};
use mesh_harness::gateway;
use mesh_harness::observability::MetricsRegistry;
use mesh_harness::random::SimRng;
use mesh_harness::Shutdown;

/// A service started on an ephemeral port.
pub struct Running {
    pub addr: SocketAddr,
    pub metrics: MetricsRegistry,
    pub shutdown: Shutdown,
}

impl Running {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn fast_backend(failure_rate: f64) -> BackendConfig {
    BackendConfig {
        work_delay: DelayRange::none(),
        failure_rate,
        ..BackendConfig::default()
    }
}

pub fn fast_gateway(backend_url: String) -> GatewayConfig {
    GatewayConfig {
        backend_url,
        work_delay: DelayRange::none(),
        ..GatewayConfig::default()
    }
}

pub async fn spawn_backend(config: BackendConfig, seed: u64) -> Running {
    let metrics = MetricsRegistry::new().unwrap();
    let server = backend::server(&config, &ServerConfig::default(), metrics.clone(), SimRng::seeded(seed));
    serve(server, metrics).await
}

pub async fn spawn_gateway(config: GatewayConfig) -> Running {
    let metrics = MetricsRegistry::new().unwrap();
    let server = gateway::server(&config, &ServerConfig::default(), metrics.clone(), SimRng::seeded(0))
        .unwrap();
    serve(server, metrics).await
}

async fn serve(server: mesh_harness::HttpServer, metrics: MetricsRegistry) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    Running {
        addr,
        metrics,
        shutdown,
    }
}

/// An address with nothing listening on it.
pub fn refused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Start a programmable upstream speaking raw HTTP/1.1 on an ephemeral port.
///
/// `f` yields the status code and body of each response; the request itself
/// is read and discarded.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = std::sync::Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        drain_request(&mut socket).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Read one request (headers plus `Content-Length` body) so closing the
/// socket afterwards does not reset the connection under the client.
async fn drain_request(socket: &mut tokio::net::TcpStream) {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        if let Some(end) = find(&data, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + length {
                return;
            }
        }
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Value of the first sample named `name` carrying every label in `labels`.
pub fn sample(export: &str, name: &str, labels: &[&str]) -> Option<f64> {
    export
        .lines()
        .filter(|line| line.starts_with(&format!("{name}{{")))
        .find(|line| labels.iter().all(|l| line.contains(l)))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|v| v.parse().ok())
}

/// `request_count_total` for one `(method, endpoint, http_status)`.
pub fn request_count(export: &str, method: &str, endpoint: &str, status: u16) -> f64 {
    let method = format!("method=\"{method}\"");
    let endpoint = format!("endpoint=\"{endpoint}\"");
    let status = format!("http_status=\"{status}\"");
    sample(export, "request_count_total", &[method.as_str(), endpoint.as_str(), status.as_str()]).unwrap_or(0.0)
}

/// Sum of every `request_count_total` sample.
pub fn total_requests(export: &str) -> f64 {
    export
        .lines()
        .filter(|line| line.starts_with("request_count_total{"))
        .filter_map(|line| line.rsplit(' ').next())
        .filter_map(|v| v.parse::<f64>().ok())
        .sum()
}

/// `request_latency_seconds_count` for one endpoint.
pub fn latency_count(export: &str, endpoint: &str) -> f64 {
    let endpoint = format!("endpoint=\"{endpoint}\"");
    sample(export, "request_latency_seconds_count", &[endpoint.as_str()]).unwrap_or(0.0)
}
