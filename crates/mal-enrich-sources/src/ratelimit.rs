use mal_enrich_config::ServiceLimits;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Floor for deficit sleeps so tiny shortfalls do not busy-loop.
const MIN_SLEEP: Duration = Duration::from_millis(100);

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket rate limiter for one upstream service: capacity `C`
/// refilled at `C / window`, computed lazily at acquisition time.
///
/// The lock is only held for the refill/deduct bookkeeping, never across
/// the sleep, so concurrent callers queue up first-come-first-served.
pub struct RateLimiter {
    capacity: f64,
    window: Duration,
    state: Mutex<BucketState>,
}

impl RateLimiter {
    pub fn new(capacity: u32, window: Duration) -> Self {
        Self {
            capacity: f64::from(capacity),
            window,
            state: Mutex::new(BucketState {
                tokens: f64::from(capacity),
                last_refill: Instant::now(),
            }),
        }
    }

    pub fn from_limits(limits: &ServiceLimits) -> Self {
        Self::new(limits.requests_per_window, limits.window())
    }

    /// Block until a token is available, then consume it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().expect("rate limiter lock poisoned");
                let now = Instant::now();
                let refill_rate = self.capacity / self.window.as_secs_f64();
                let elapsed = now.duration_since(state.last_refill).as_secs_f64();
                if elapsed > 0.0 {
                    state.tokens = (state.tokens + refill_rate * elapsed).min(self.capacity);
                    state.last_refill = now;
                }

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }

                Duration::from_secs_f64((1.0 - state.tokens) / refill_rate).max(MIN_SLEEP)
            };
            tokio::time::sleep(wait).await;
        }
    }
}
