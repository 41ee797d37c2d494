//! Injectable random source for simulated work, failures and chaos choices.
//!
//! Every piece of randomness in the harness flows through a [`SimRng`]. A
//! seeded instance replays the exact same sequence of delays, failures and
//! disruption picks, which is what lets tests assert exact counts instead of
//! statistical bounds.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DelayRange;

/// Shared, thread-safe handle to a single random stream.
#[derive(Clone, Debug)]
pub struct SimRng {
    inner: Arc<Mutex<StdRng>>,
}

impl SimRng {
    /// Deterministic stream from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::wrap(StdRng::seed_from_u64(seed))
    }

    /// Non-deterministic stream seeded from the OS.
    pub fn from_entropy() -> Self {
        Self::wrap(StdRng::from_entropy())
    }

    /// Seeded if a seed is configured, otherwise from entropy.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    fn wrap(rng: StdRng) -> Self {
        Self {
            inner: Arc::new(Mutex::new(rng)),
        }
    }

    /// Run `f` with exclusive access to the underlying generator.
    ///
    /// The lock is only held for the duration of `f`, never across an await.
    pub fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Uniform duration in `[range.min_ms, range.max_ms]`, microsecond resolution.
    pub fn delay_in(&self, range: &DelayRange) -> Duration {
        let lo = range.min_ms.saturating_mul(1_000);
        let hi = range.max_ms.saturating_mul(1_000).max(lo);
        let micros = self.with(|rng| rng.gen_range(lo..=hi));
        Duration::from_micros(micros)
    }

    /// Bernoulli trial: true with probability `p`.
    pub fn chance(&self, p: f64) -> bool {
        self.with(|rng| rng.gen::<f64>() < p)
    }

    /// Uniform pick from a non-empty slice.
    pub fn pick<T: Copy>(&self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.with(|rng| rng.gen_range(0..items.len()));
        items.get(idx).copied()
    }
}
