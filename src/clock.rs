//! Wall-clock time limit.
//!
//! Algorithms call [`Clock::expired`] at the top of every iteration of their
//! main loop and return their best tour once it reports `true`. Nothing is
//! interrupted preemptively, so a run overshoots its limit by at most one
//! iteration of the loop that observed the expiry.

use std::time::{Duration, Instant};

/// Start time plus an optional limit.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
    limit: Option<Duration>,
}

impl Clock {
    /// Starts a clock now.
    pub fn start(limit: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    /// A clock that never expires.
    pub fn unlimited() -> Self {
        Self::start(None)
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether the limit has been reached.
    #[inline]
    pub fn expired(&self) -> bool {
        self.limit.is_some_and(|limit| self.start.elapsed() >= limit)
    }

    /// Time left, `None` when unlimited.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit.map(|limit| limit.saturating_sub(self.start.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_never_expires() {
        let clock = Clock::unlimited();
        assert!(!clock.expired());
        assert!(clock.remaining().is_none());
    }

    #[test]
    fn test_zero_limit_expires_immediately() {
        let clock = Clock::start(Some(Duration::ZERO));
        assert!(clock.expired());
        assert_eq!(clock.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_limit_expires_after_sleep() {
        let clock = Clock::start(Some(Duration::from_millis(20)));
        assert!(!clock.expired());
        std::thread::sleep(Duration::from_millis(30));
        assert!(clock.expired());
    }
}
