//! Synthetic load against the gateway.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::{DelayRange, TrafficConfig};
use crate::random::SimRng;

/// Unending loop of `POST /analyze` calls with random pauses.
///
/// Holds no failure state: every iteration is independent of the last.
pub struct TrafficGenerator {
    client: reqwest::Client,
    analyze_url: String,
    interval: DelayRange,
    rng: SimRng,
}

impl TrafficGenerator {
    pub fn new(config: &TrafficConfig, rng: SimRng) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            analyze_url: format!("{}/analyze", config.gateway_url.trim_end_matches('/')),
            interval: config.interval,
            rng,
        })
    }

    /// Run until `shutdown` fires. Never stops on its own.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(target_url = %self.analyze_url, "Starting traffic generator");

        loop {
            tokio::select! {
                _ = self.fire() => {}
                _ = shutdown.recv() => break,
            }

            let pause = self.rng.delay_in(&self.interval);
            tokio::select! {
                _ = time::sleep(pause) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!("Traffic generator stopped");
    }

    /// Issue one request and log its outcome. Failures are only logged.
    pub async fn fire(&self) -> Option<StatusCode> {
        let result = self
            .client
            .post(&self.analyze_url)
            .json(&json!({ "data": "test" }))
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    tracing::info!(status = %status, "Request sent");
                } else {
                    tracing::warn!(status = %status, "Request sent, gateway reported failure");
                }
                Some(status)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Request failed");
                None
            }
        }
    }
}
