//! Token-bucket admission gate.
//!
//! `RateLimiter` is shared by reference (or `Arc`) between request tasks. The
//! refill-then-decide step runs under a per-instance mutex, so concurrent
//! callers never observe a half-updated bucket. `acquire` never sleeps and
//! never fails: retrying, queueing or rejecting is up to the caller.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::error::{LandSearchError, Result};

/// Bucket state. `0 <= tokens <= burst` holds between calls.
#[derive(Debug)]
struct TokenBucket {
    rate: f64,
    burst: f64,
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn refill(&mut self, now: Instant) {
        // saturates to zero if `now` is older than the last update
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.burst);
        self.last_update = now;
    }

    fn try_take(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Thread-safe token-bucket rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    rate: f64,
    burst: f64,
    bucket: Mutex<TokenBucket>,
}

impl RateLimiter {
    /// Create a limiter refilling `rate` tokens per second, capped at `burst`.
    /// The bucket starts full.
    pub fn new(rate: f64, burst: f64) -> Result<Self> {
        Self::with_instant(rate, burst, Instant::now())
    }

    /// Create a limiter whose refill clock starts at `now` (deterministic callers).
    pub fn with_instant(rate: f64, burst: f64, now: Instant) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(LandSearchError::InvalidConfiguration(format!(
                "rate must be a positive number, got {rate}"
            )));
        }
        if !burst.is_finite() || burst <= 0.0 {
            return Err(LandSearchError::InvalidConfiguration(format!(
                "burst must be a positive number, got {burst}"
            )));
        }

        Ok(Self {
            rate,
            burst,
            bucket: Mutex::new(TokenBucket {
                rate,
                burst,
                tokens: burst,
                last_update: now,
            }),
        })
    }

    /// Admit one unit of work if a token is available.
    pub fn acquire(&self) -> bool {
        self.acquire_at(Instant::now())
    }

    /// Same as [`acquire`](Self::acquire) with an explicit clock reading.
    pub fn acquire_at(&self, now: Instant) -> bool {
        let admitted = self.lock().try_take(now);
        if !admitted {
            tracing::trace!(rate = self.rate, burst = self.burst, "rate limiter rejected");
        }
        admitted
    }

    /// Tokens available at `now` (refills, does not consume).
    pub fn available_at(&self, now: Instant) -> f64 {
        let mut bucket = self.lock();
        bucket.refill(now);
        bucket.tokens
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn burst(&self) -> f64 {
        self.burst
    }

    // Every mutation leaves the bucket consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, TokenBucket> {
        self.bucket.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::time::Duration;

    #[test]
    fn rejects_non_positive_config() {
        for (rate, burst) in [(0.0, 5.0), (-1.0, 5.0), (2.0, 0.0), (2.0, -3.0), (f64::NAN, 1.0), (1.0, f64::INFINITY)] {
            let err = RateLimiter::new(rate, burst).unwrap_err();
            assert!(matches!(err, LandSearchError::InvalidConfiguration(_)), "{rate}/{burst}");
        }
    }

    #[test]
    fn zero_elapsed_does_not_refill() {
        let t0 = Instant::now();
        let lim = RateLimiter::with_instant(1000.0, 1.0, t0).unwrap();
        assert!(lim.acquire_at(t0));
        assert!(!lim.acquire_at(t0));
        assert!(!lim.acquire_at(t0));
    }

    #[test]
    fn fractional_refill_accumulates() {
        let t0 = Instant::now();
        let lim = RateLimiter::with_instant(1.0, 3.0, t0).unwrap();
        for _ in 0..3 {
            assert!(lim.acquire_at(t0));
        }

        // three 0.4s steps: 0.4, 0.8, then 1.2 tokens
        assert!(!lim.acquire_at(t0 + Duration::from_millis(400)));
        assert!(!lim.acquire_at(t0 + Duration::from_millis(800)));
        assert!(lim.acquire_at(t0 + Duration::from_millis(1200)));
        let left = lim.available_at(t0 + Duration::from_millis(1200));
        assert!((left - 0.2).abs() < 1e-9, "left={left}");
    }

    #[test]
    fn clock_going_backwards_adds_nothing() {
        let t0 = Instant::now();
        let later = t0 + Duration::from_secs(5);
        let lim = RateLimiter::with_instant(1.0, 2.0, later).unwrap();
        assert!(lim.acquire_at(t0));
        assert!((lim.available_at(t0) - 1.0).abs() < 1e-9);
    }
}
