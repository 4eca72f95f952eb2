//! Bounded retry around a single provider call.
//!
//! The retry policy is an explicit, testable combinator rather than something
//! buried inside each client: clients do one attempt, this module decides how
//! often and how far apart.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::providers::ProviderError;

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Same delay before every retry.
    Fixed(Duration),
    /// `base * 2^(attempt-1)`: base, 2*base, 4*base, ...
    Exponential { base: Duration },
}

impl BackoffStrategy {
    /// Delay before `attempt` (1-based; attempt 0 is the initial call and
    /// never sleeps).
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            BackoffStrategy::Fixed(d) => *d,
            BackoffStrategy::Exponential { base } => *base * (1u32 << (attempt - 1).min(16)),
        }
    }
}

/// How many times to call and how long to wait in between.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
}

/// Runs `op` up to `policy.max_attempts` times, sleeping per the backoff
/// schedule between attempts. Non-retryable errors abort immediately;
/// retryable ones are kept and the last is returned on exhaustion.
pub async fn retry<F, Fut, T>(provider: &str, policy: &RetryPolicy, mut op: F) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error = ProviderError::EmptyContent;

    for attempt in 0..attempts {
        if attempt > 0 {
            let delay = policy.backoff.delay(attempt);
            warn!(
                provider,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "provider call failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() => last_error = err,
            Err(err) => return Err(err),
        }
    }

    Err(last_error)
}
