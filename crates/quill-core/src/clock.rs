//! Time source abstraction.
//!
//! Throttling and character reveal read time through `Clock` so tests can
//! drive virtual time with `ManualClock` instead of waiting on the wall clock.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    /// Suspends the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Real time backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Virtual time that only moves when told to.
///
/// `sleep` advances the clock by the requested duration and returns
/// immediately.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        *elapsed += duration;
    }

    /// Virtual time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_clock_sleep_advances_time() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.sleep(Duration::from_millis(50)).await;
        clock.advance(Duration::from_millis(25));
        assert_eq!(clock.now() - start, Duration::from_millis(75));
        assert_eq!(clock.elapsed(), Duration::from_millis(75));
    }
}
