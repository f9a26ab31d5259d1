use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default minimum spacing between forwarded display updates.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(50);

/// Default unforwarded backlog (in characters) that forces an update.
pub const DEFAULT_MAX_BACKLOG_CHARS: usize = 10;

/// Tuning for [`UpdateThrottler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    pub min_interval: Duration,
    /// Backlog strictly greater than this forces an update. `usize::MAX`
    /// disables the size trigger.
    pub max_backlog_chars: usize,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
            max_backlog_chars: DEFAULT_MAX_BACKLOG_CHARS,
        }
    }
}

/// Decides which accumulation events reach the display.
///
/// The throttler only sees character counts and timestamps; the caller owns
/// the text. `finish` always returns `true` exactly once, so the final
/// accumulated text is always forwarded no matter where the stream ended
/// relative to the interval.
#[derive(Debug, Clone)]
pub struct UpdateThrottler {
    config: ThrottleConfig,
    last_forward_at: Option<Instant>,
    forwarded_chars: usize,
    finished: bool,
}

impl UpdateThrottler {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            last_forward_at: None,
            forwarded_chars: 0,
            finished: false,
        }
    }

    /// Offers the current accumulated length. Returns `true` if the caller
    /// should forward the text now.
    pub fn observe(&mut self, total_chars: usize, now: Instant) -> bool {
        if self.finished {
            return false;
        }

        let backlog = total_chars.saturating_sub(self.forwarded_chars);
        let interval_elapsed = match self.last_forward_at {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.config.min_interval,
        };
        let backlog_exceeded = backlog > self.config.max_backlog_chars;

        if interval_elapsed || backlog_exceeded {
            self.mark_forwarded(total_chars, now);
            true
        } else {
            false
        }
    }

    /// Signals end of stream. Returns `true` on the first call only.
    pub fn finish(&mut self, total_chars: usize, now: Instant) -> bool {
        if self.finished {
            return false;
        }
        self.finished = true;
        self.mark_forwarded(total_chars, now);
        true
    }

    /// Characters not yet forwarded, given the current total.
    pub fn backlog(&self, total_chars: usize) -> usize {
        total_chars.saturating_sub(self.forwarded_chars)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn mark_forwarded(&mut self, total_chars: usize, now: Instant) {
        self.last_forward_at = Some(now);
        self.forwarded_chars = total_chars;
    }
}

impl Default for UpdateThrottler {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}
