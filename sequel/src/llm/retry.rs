//! Finite-state retry policy for completion calls.
//!
//! Each attempt's classified outcome is fed to [`RetryPolicy::transition`],
//! which yields either a terminal state or a backoff before the next attempt.
//! The attempt counter only grows and is capped by `max_attempts`, so a
//! driver loop over these states always terminates.

use std::time::Duration;

use super::CompletionError;

/// Wait after the upstream reports too many requests.
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(5);
/// Wait after an attempt timed out.
pub const TIMEOUT_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub enum RetryState {
    /// About to send attempt number `attempt` (1-based).
    Attempting { attempt: u32 },
    /// Waiting `delay` before attempt `attempt + 1`.
    Backoff {
        attempt: u32,
        delay: Duration,
        cause: CompletionError,
    },
    Succeeded(String),
    Failed(CompletionError),
}

impl RetryState {
    pub fn initial() -> Self {
        Self::Attempting { attempt: 1 }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first.
    pub max_attempts: u32,
    pub rate_limit_backoff: Duration,
    pub timeout_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            rate_limit_backoff: RATE_LIMIT_BACKOFF,
            timeout_backoff: TIMEOUT_BACKOFF,
        }
    }

    pub fn with_backoffs(mut self, rate_limit: Duration, timeout: Duration) -> Self {
        self.rate_limit_backoff = rate_limit;
        self.timeout_backoff = timeout;
        self
    }

    /// Next state after attempt `attempt` finished with `outcome`.
    pub fn transition(
        &self,
        attempt: u32,
        outcome: std::result::Result<String, CompletionError>,
    ) -> RetryState {
        let error = match outcome {
            Ok(text) => return RetryState::Succeeded(text),
            Err(error) => error,
        };

        match self.backoff_for(&error) {
            Some(delay) if attempt < self.max_attempts => RetryState::Backoff {
                attempt,
                delay,
                cause: error,
            },
            _ => RetryState::Failed(error),
        }
    }

    /// Leave a backoff state. Any other state is returned unchanged.
    pub fn resume(&self, state: RetryState) -> RetryState {
        match state {
            RetryState::Backoff { attempt, .. } => RetryState::Attempting {
                attempt: attempt + 1,
            },
            other => other,
        }
    }

    fn backoff_for(&self, error: &CompletionError) -> Option<Duration> {
        match error {
            CompletionError::RateLimited => Some(self.rate_limit_backoff),
            CompletionError::Timeout => Some(self.timeout_backoff),
            _ => None,
        }
    }
}
