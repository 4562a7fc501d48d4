//! Exponential backoff policy for redelivery scheduling.

use std::time::Duration;

/// Exponential backoff with a delay cap and a hard attempt budget.
///
/// Delay grows as `base * 2^attempt`, capped at `max_delay`. Once
/// `attempt` reaches `max_attempts` the entry is out of budget and
/// `next_delay` returns `None`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Base delay.
    pub base: Duration,
    /// Maximum delay cap.
    pub max_delay: Duration,
    /// Maximum number of attempts.
    pub max_attempts: u32,
}

impl ExponentialBackoff {
    /// Creates the default policy: 30s base, 1h cap, 5 attempts.
    pub fn new() -> Self {
        Self {
            base: Duration::from_secs(30),
            max_delay: Duration::from_secs(3600),
            max_attempts: 5,
        }
    }

    /// Sets the base delay.
    pub fn base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    /// Sets the maximum delay.
    pub fn max_delay(mut self, max: Duration) -> Self {
        self.max_delay = max;
        self
    }

    /// Sets the maximum attempts.
    pub fn max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    /// Returns the delay before the next attempt, or `None` if the
    /// attempt budget is exhausted.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }

        let multiplier = 2_u32.saturating_pow(attempt);
        Some(std::cmp::min(self.base.saturating_mul(multiplier), self.max_delay))
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new()
    }
}
