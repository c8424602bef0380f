//! Rate limiting for the POI-search source.
//!
//! The search API rejects callers that exceed roughly one request per
//! second, so every query pays a fixed delay up front. The delay is a
//! hard per-request cost, not a backoff. Batch logic takes the limiter
//! as a trait object so tests can swap in one that does not sleep.

use std::time::Duration;

use async_trait::async_trait;

/// Gates outbound requests to a rate-limited source.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Blocks until the next request may be sent.
    async fn acquire(&self);
}

/// Waits a fixed interval before every request.
pub struct FixedDelay {
    interval: Duration,
}

impl FixedDelay {
    /// Creates a limiter that sleeps `interval` on every [`RateLimiter::acquire`].
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Creates a limiter from a millisecond count, as configured.
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn acquire(&self) {
        tokio::time::sleep(self.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_waits_the_configured_interval() {
        let limiter = FixedDelay::from_millis(1100);
        let before = tokio::time::Instant::now();
        limiter.acquire().await;
        assert_eq!(before.elapsed(), Duration::from_millis(1100));
    }
}
