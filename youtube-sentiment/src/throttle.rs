//! Pacing between API calls.
//!
//! The Data API has no published per-second limit for key-authenticated reads, but bursts of
//! batch requests get throttled. We pause for a fixed interval after each pagination walk,
//! each batch, and each channel lookup. There is no backoff and no retry.

use std::future::Future;
use std::time::Duration;

/// Decides how long to hold off before the next API call.
pub trait RateLimiter {
    fn wait_before_next_call(&self) -> impl Future<Output = ()> + Send;
}

/// Always waits the same amount of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl RateLimiter for FixedDelay {
    async fn wait_before_next_call(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::trace!(delay = ?self.delay, "pausing before next API call");
        tokio::time::sleep(self.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn waits_the_configured_delay() {
        let limiter = FixedDelay::default();
        let start = tokio::time::Instant::now();
        limiter.wait_before_next_call().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_returns_immediately() {
        let limiter = FixedDelay::new(Duration::ZERO);
        let start = tokio::time::Instant::now();
        limiter.wait_before_next_call().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
