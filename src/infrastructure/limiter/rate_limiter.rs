use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;

/// A token bucket which allows fractional tokens for precise refill
#[derive(Debug)]
struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, refill_per_sec: f64) -> Self {
        let now = Instant::now();
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec,
            last_refill: now,
            last_seen: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
            self.last_refill = now;
        }
    }

    /// Consumes one token, or returns the whole seconds until one is available.
    fn try_consume(&mut self) -> Result<(), u64> {
        let now = Instant::now();
        self.last_seen = now;
        self.refill(now);
        // epsilon guards against fp drift
        if self.tokens + 1e-12 >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - self.tokens;
            Err(((missing / self.refill_per_sec).ceil() as u64).max(1))
        }
    }
}

/// Per-key limiter: `per_minute` requests per rolling minute, bursting up
/// to the same amount.
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<DashMap<String, Arc<Mutex<TokenBucket>>>>,
    capacity: f64,
    refill_per_sec: f64,
}

impl RateLimiter {
    pub fn per_minute(per_minute: u32) -> Self {
        let capacity = f64::from(per_minute.max(1));
        Self {
            buckets: Arc::new(DashMap::new()),
            capacity,
            refill_per_sec: capacity / 60.0,
        }
    }

    fn bucket(&self, key: &str) -> Arc<Mutex<TokenBucket>> {
        if let Some(existing) = self.buckets.get(key) {
            return existing.clone();
        }
        self.buckets
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TokenBucket::new(self.capacity, self.refill_per_sec))))
            .clone()
    }

    /// `Ok` when allowed, otherwise `Err(retry_after_secs)`.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.bucket(key).lock().try_consume()
    }

    /// Drops buckets idle for longer than `ttl`. Returns how many went.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now.duration_since(bucket.lock().last_seen) < ttl);
        before.saturating_sub(self.buckets.len())
    }

    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_burst_then_rejects() {
        let limiter = RateLimiter::per_minute(3);
        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_ok());

        let retry_after = limiter.check("1.2.3.4").unwrap_err();
        assert!((1..=20).contains(&retry_after));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::per_minute(1);
        assert!(limiter.check("a").is_ok());
        assert!(limiter.check("a").is_err());
        assert!(limiter.check("b").is_ok());
    }

    #[test]
    fn evicts_idle_buckets() {
        let limiter = RateLimiter::per_minute(5);
        limiter.check("a").unwrap();
        assert_eq!(limiter.tracked_keys(), 1);
        assert_eq!(limiter.evict_idle(Duration::ZERO), 1);
        assert_eq!(limiter.tracked_keys(), 0);
    }
}
