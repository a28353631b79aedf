//! Token bucket pacing for scraper requests.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<Bucket>>,
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
    capacity: f64,
    refill_per_sec: f64,
}

impl Bucket {
    fn refill(&mut self, now: Instant) {
        // A pending reservation pushed last_refill into the future
        if now < self.last_refill {
            return;
        }
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }

    /// Take a token, returning how long the caller must wait first
    fn take(&mut self, now: Instant) -> Duration {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Duration::ZERO
        } else {
            // Queue behind any reservation that is still pending
            let start = self.last_refill.max(now);
            let wait = (1.0 - self.tokens) / self.refill_per_sec;
            self.tokens = 0.0;
            // The token refilled during the wait is consumed by this caller
            self.last_refill = start + Duration::from_secs_f64(wait);
            self.last_refill - now
        }
    }
}

impl RateLimiter {
    /// Allow `requests_per_minute` requests, bursting up to `burst`
    pub fn new(requests_per_minute: u32, burst: u32) -> Self {
        let rpm = requests_per_minute.max(1) as f64;
        let capacity = burst.max(1) as f64;

        Self {
            state: Arc::new(Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
                capacity,
                refill_per_sec: rpm / 60.0,
            })),
        }
    }

    /// Polite default for a public site: small bursts, then `rpm`
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self::new(requests_per_minute, 2)
    }

    /// Wait for a token
    pub async fn acquire(&self) {
        let delay = self.state.lock().await.take(Instant::now());
        if !delay.is_zero() {
            tracing::debug!("Rate limited, waiting {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_wait() {
        let now = Instant::now();
        let mut bucket = Bucket {
            tokens: 2.0,
            last_refill: now,
            capacity: 2.0,
            refill_per_sec: 1.0,
        };

        assert_eq!(bucket.take(now), Duration::ZERO);
        assert_eq!(bucket.take(now), Duration::ZERO);
        assert_eq!(bucket.take(now), Duration::from_secs(1));
    }

    #[test]
    fn test_waiting_callers_are_spaced() {
        let now = Instant::now();
        let mut bucket = Bucket {
            tokens: 0.0,
            last_refill: now,
            capacity: 1.0,
            refill_per_sec: 1.0,
        };

        assert_eq!(bucket.take(now), Duration::from_secs(1));
        assert_eq!(bucket.take(now), Duration::from_secs(2));
        // Half way through the first wait
        assert_eq!(bucket.take(now + Duration::from_millis(500)), Duration::from_millis(2500));
    }

    #[test]
    fn test_refill_is_capped() {
        let now = Instant::now();
        let mut bucket = Bucket {
            tokens: 0.0,
            last_refill: now,
            capacity: 2.0,
            refill_per_sec: 1.0,
        };

        bucket.refill(now + Duration::from_secs(60));
        assert_eq!(bucket.tokens, 2.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_paces_requests() {
        let limiter = RateLimiter::new(60, 1);
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(999));
    }
}
