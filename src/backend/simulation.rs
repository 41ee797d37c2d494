//! Simulated processing cost and failure injection.

use std::time::Duration;

use crate::config::{BackendConfig, DelayRange};
use crate::random::SimRng;

/// What one `/process` call will do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessOutcome {
    pub delay: Duration,
    pub failed: bool,
}

/// Draws i.i.d. outcomes: a uniform delay and a Bernoulli(failure_rate) failure.
#[derive(Debug, Clone)]
pub struct ProcessSimulator {
    work_delay: DelayRange,
    failure_rate: f64,
    rng: SimRng,
}

impl ProcessSimulator {
    pub fn new(work_delay: DelayRange, failure_rate: f64, rng: SimRng) -> Self {
        Self {
            work_delay,
            failure_rate,
            rng,
        }
    }

    pub fn from_config(config: &BackendConfig, rng: SimRng) -> Self {
        Self::new(config.work_delay, config.failure_rate, rng)
    }

    pub fn next_outcome(&self) -> ProcessOutcome {
        let delay = self.rng.delay_in(&self.work_delay);
        let failed = self.rng.chance(self.failure_rate);
        ProcessOutcome { delay, failed }
    }
}
