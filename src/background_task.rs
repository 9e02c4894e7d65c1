use tokio::time::{interval, Duration};

use crate::limiter::rate_limiter::RateLimiter;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);
const IDLE_TTL: Duration = Duration::from_secs(10 * 60);

/// Periodically forgets clients that stopped chatting.
pub async fn start_limiter_eviction(limiter: RateLimiter) {
    let mut interval = interval(EVICTION_INTERVAL);

    loop {
        interval.tick().await;

        let evicted = limiter.evict_idle(IDLE_TTL);
        if evicted > 0 {
            tracing::debug!("Evicted {} idle rate-limit buckets", evicted);
        }
    }
}
