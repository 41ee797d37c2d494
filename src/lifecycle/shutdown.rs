//! Cancellation hook shared by servers, the traffic loop and the chaos loop.
//!
//! Nothing in the harness drains or coordinates on stop. `Ctrl-C` in the
//! binary and the integration tests are the only callers of [`Shutdown::trigger`];
//! tests use it to tear down the gateway, backend and loops they spawn.
//!
//! Cancellation points:
//! - `HttpServer::run`: stops accepting, lets axum finish open connections
//! - `TrafficGenerator::run`: abandons the in-flight request or pause
//! - `ChaosController::run`: only while waiting out the quiet period

use tokio::sync::broadcast;

/// One-shot stop signal fanned out to every subscriber.
///
/// Subscribe before spawning the task that listens; a receiver created after
/// [`trigger`](Self::trigger) never sees that signal.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every current subscriber. Harmless with none, and repeatable.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut server = shutdown.subscribe();
        let mut chaos = shutdown.subscribe();

        shutdown.trigger();
        assert!(server.recv().await.is_ok());
        assert!(chaos.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_trigger_without_subscribers_is_harmless() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.trigger();

        let mut late = shutdown.subscribe();
        assert!(late.try_recv().is_err());
    }
}
