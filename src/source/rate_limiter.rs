use std::time::Instant;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};
use reqwest::Response;

/// Soft client-side pacing for datasets-server requests.
///
/// Caps requests per rolling minute. It only delays; a rejected request is
/// never replayed.
pub struct RateLimiter {
    state: Mutex<RateLimitState>,
    max_per_minute: u32,
}

struct RateLimitState {
    requests_this_minute: u32,
    minute_start: Instant,
}

impl RateLimiter {
    /// `max_per_minute == 0` disables pacing.
    pub fn new(max_per_minute: u32) -> Self {
        Self {
            state: Mutex::new(RateLimitState {
                requests_this_minute: 0,
                minute_start: Instant::now(),
            }),
            max_per_minute,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(0)
    }

    pub async fn wait(&self) {
        if self.max_per_minute == 0 {
            return;
        }

        let mut state = self.state.lock().await;

        let minute_elapsed = state.minute_start.elapsed();
        if minute_elapsed < Duration::from_secs(60) {
            if state.requests_this_minute >= self.max_per_minute {
                let wait_time = Duration::from_secs(60) - minute_elapsed;
                tracing::debug!("Soft rate limiting, waiting {:?}", wait_time);
                sleep(wait_time).await;
                state.requests_this_minute = 0;
                state.minute_start = Instant::now();
            }
        } else {
            state.requests_this_minute = 0;
            state.minute_start = Instant::now();
        }

        state.requests_this_minute += 1;
    }

    pub async fn requests_this_minute(&self) -> u32 {
        self.state.lock().await.requests_this_minute
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(120)
    }
}

/// Seconds from a `Retry-After` header, when the server sent one.
pub fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_requests_within_window() {
        let limiter = RateLimiter::new(10);
        for _ in 0..3 {
            limiter.wait().await;
        }
        assert_eq!(limiter.requests_this_minute().await, 3);
    }

    #[tokio::test]
    async fn test_unlimited_does_not_track() {
        let limiter = RateLimiter::unlimited();
        for _ in 0..500 {
            limiter.wait().await;
        }
        assert_eq!(limiter.requests_this_minute().await, 0);
    }
}
