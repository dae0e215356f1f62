//! Fixed-delay throttling between requests to the bulk-export endpoint.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// A single-slot delay gate.
///
/// After a request is released, the next `acquire` waits until `delay` has passed.
/// The first acquire never waits, and nothing waits after the last request.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
    next_slot: Option<Instant>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits until the slot is free.
    pub async fn acquire(&mut self) {
        if let Some(next_slot) = self.next_slot.take() {
            sleep_until(next_slot).await;
        }
    }

    /// Marks the end of a request; the delay counts from here.
    pub fn release(&mut self) {
        self.next_slot = Some(Instant::now() + self.delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_acquire_does_not_wait() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_waits_between_requests() {
        let delay = Duration::from_millis(50);
        let mut limiter = RateLimiter::new(delay);
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
            limiter.release();
        }
        // two gaps between three requests
        assert!(start.elapsed() >= delay * 2);
    }

    #[tokio::test]
    async fn test_zero_delay() {
        let mut limiter = RateLimiter::new(Duration::ZERO);
        limiter.release();
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(limiter.delay(), Duration::ZERO);
    }
}
