//! Rate limiter for outbound upstream calls.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum delay between consecutive upstream calls.
///
/// One instance is shared (behind an `Arc`) by every pipeline invocation. The
/// lock is held across the sleep, so concurrent callers queue up and each
/// waits out the interval after its predecessor.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    /// `None` until the first call, so the first call never waits
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a call is allowed, record it, and return its start time.
    pub async fn throttle(&self) -> Instant {
        let mut last = self.last_call.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                log::debug!("Rate limit: waiting {} ms", wait.as_millis());
                tokio::time::sleep(wait).await;
            }
        }
        let now = Instant::now();
        *last = Some(now);
        now
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
