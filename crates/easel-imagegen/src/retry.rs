use std::time::Duration;

use easel_config::{ImageConfig, MIN_ATTEMPT_WINDOW};
use tokio::time::Instant;

use crate::provider::RemoteError;

/// Deadlines and retry schedule for one image request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub exponential: bool,
    /// Upper bound for a single attempt
    pub attempt_timeout: Duration,
    /// Upper bound for the whole request, delays included
    pub budget: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            max_attempts: config.retry.max_attempts.max(1),
            backoff: config.retry.backoff,
            exponential: config.retry.exponential,
            attempt_timeout: config.timeout.attempt,
            budget: config.timeout.budget,
        }
    }

    /// Deadline for an attempt starting at `now`, never past the budget
    pub fn attempt_deadline(&self, now: Instant, budget_deadline: Instant) -> Instant {
        (now + self.attempt_timeout).min(budget_deadline)
    }

    /// Pause before retry number `retry` (1-based)
    pub fn delay(&self, retry: u32) -> Duration {
        if self.exponential {
            let factor = 2_u32.saturating_pow(retry.saturating_sub(1));
            self.backoff.saturating_mul(factor)
        } else {
            self.backoff
        }
    }

    /// Delay before the next attempt, or `None` when the request should fail now
    ///
    /// `attempt` is the 1-based number of the attempt that just failed. A retry
    /// is only scheduled if it would still have a usable window once the delay
    /// has elapsed.
    pub fn next_delay(
        &self,
        error: &RemoteError,
        attempt: u32,
        now: Instant,
        budget_deadline: Instant,
    ) -> Option<Duration> {
        if !error.is_transient() || attempt >= self.max_attempts {
            return None;
        }

        let delay = self.delay(attempt);
        (now + delay + MIN_ATTEMPT_WINDOW <= budget_deadline).then_some(delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ImageConfig::default())
    }
}
