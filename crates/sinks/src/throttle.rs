//! Reconnect rate limiting
//!
//! A down destination must not turn every event into a connect() attempt.
//! The throttle allows one attempt per interval; everything in between is
//! answered from the cached failure.

use std::time::{Duration, Instant};

/// Default minimum wait between reconnect attempts
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(1);

/// Rate limiter for reconnect attempts
///
/// Not thread-safe by itself; it lives inside the backend, which is
/// already serialized by the sink mutex.
#[derive(Debug)]
pub struct ReconnectThrottle {
    /// Minimum interval between attempts
    min_interval: Duration,

    /// When the last attempt was made
    last_attempt: Option<Instant>,
}

impl ReconnectThrottle {
    /// Create a throttle with the given minimum interval
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_attempt: None,
        }
    }

    /// Whether a reconnect may be attempted now.
    ///
    /// Returns true at most once per interval and records the attempt
    /// timestamp when it does.
    pub fn should_attempt(&mut self) -> bool {
        self.should_attempt_at(Instant::now())
    }

    /// Clock-injected variant of [`should_attempt`](Self::should_attempt)
    pub fn should_attempt_at(&mut self, now: Instant) -> bool {
        match self.last_attempt {
            None => {
                self.last_attempt = Some(now);
                true
            }
            Some(last) if now.duration_since(last) >= self.min_interval => {
                self.last_attempt = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Forget the last attempt, e.g. after a successful connect
    pub fn reset(&mut self) {
        self.last_attempt = None;
    }
}

impl Default for ReconnectThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_INTERVAL)
    }
}
