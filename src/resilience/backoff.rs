//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

/// Delay schedule for repeated load attempts.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    base_ms: u64,
    max_ms: u64,
}

impl Backoff {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self { base_ms, max_ms }
    }

    /// Delay before retry number `attempt` (1-based). Attempt 0 never waits.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let capped = self
            .base_ms
            .saturating_mul(2u64.saturating_pow(attempt - 1))
            .min(self.max_ms);

        // up to 10% jitter
        let spread = capped / 10;
        let jitter = if spread > 0 {
            rand::thread_rng().gen_range(0..spread)
        } else {
            0
        };

        Duration::from_millis(capped + jitter)
    }
}
