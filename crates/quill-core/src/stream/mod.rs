//! Incremental response plumbing: accumulation and display throttling.

mod buffer;
mod throttle;

pub use buffer::FragmentBuffer;
pub use throttle::{
    DEFAULT_MAX_BACKLOG_CHARS, DEFAULT_MIN_INTERVAL, ThrottleConfig, UpdateThrottler,
};
