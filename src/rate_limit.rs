//! Client-side rate limiting.
//!
//! VK rejects callers that exceed a few requests per second with error 6, so
//! the client throttles itself before dispatching. The limiter is a simple
//! fixed-window counter: it smooths bursts by blocking the calling thread and
//! never rejects a call.

use std::time::{Duration, Instant};

/// The default ceiling, matching the limit VK applies to user tokens.
pub const DEFAULT_MAX_REQUESTS_PER_SECOND: u32 = 3;

/// Length of one rate window.
pub const WINDOW: Duration = Duration::from_secs(1);

/// Fixed-window request counter.
///
/// Each [`acquire`](RateLimiter::acquire) counts one request. While the count
/// stays within the ceiling nothing happens. Once it exceeds the ceiling:
///
/// - if the current window is still open, the caller sleeps until it closes
///   and the count is left as is, so the next call is checked again;
/// - otherwise the count drops by the number of request slots
///   (`WINDOW / max`) that elapsed since the window started, floored at
///   zero, and a new window starts now.
///
/// # Examples
///
/// ```
/// use vkapi::rate_limit::RateLimiter;
///
/// let mut limiter = RateLimiter::new(20);
/// for _ in 0..20 {
///     assert!(limiter.acquire().is_zero());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RateLimiter {
    max_requests_per_second: u32,
    counter: u32,
    window_start: Instant,
}

impl RateLimiter {
    /// Creates a limiter whose first window starts now.
    ///
    /// A ceiling of zero is treated as one request per second.
    pub fn new(max_requests_per_second: u32) -> Self {
        Self {
            max_requests_per_second: max_requests_per_second.max(1),
            counter: 0,
            window_start: Instant::now(),
        }
    }

    /// Changes the ceiling; effective on the next call.
    pub fn set_max_requests_per_second(&mut self, max_requests_per_second: u32) {
        self.max_requests_per_second = max_requests_per_second.max(1);
    }

    pub fn max_requests_per_second(&self) -> u32 {
        self.max_requests_per_second
    }

    /// The number of requests currently counted against the window.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Counts one request, sleeping first if the ceiling is exceeded.
    ///
    /// Returns how long the calling thread was blocked.
    pub fn acquire(&mut self) -> Duration {
        match self.admit(Instant::now()) {
            Some(wait) => {
                tracing::debug!(
                    wait_ms = wait.as_millis(),
                    counter = self.counter,
                    max_requests_per_second = self.max_requests_per_second,
                    "Rate limit reached - blocking until window closes"
                );
                std::thread::sleep(wait);
                wait
            }
            None => Duration::ZERO,
        }
    }

    /// Applies the window policy at `now` and returns the required wait.
    fn admit(&mut self, now: Instant) -> Option<Duration> {
        self.counter = self.counter.saturating_add(1);
        if self.counter <= self.max_requests_per_second {
            return None;
        }

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < WINDOW {
            return Some(WINDOW - elapsed);
        }

        let slot = WINDOW / self.max_requests_per_second;
        let missed = u32::try_from(elapsed.as_nanos() / slot.as_nanos()).unwrap_or(u32::MAX);
        self.counter = self.counter.saturating_sub(missed);
        self.window_start = now;
        None
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS_PER_SECOND)
    }
}
