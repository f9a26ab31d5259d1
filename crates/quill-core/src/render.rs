//! Character-reveal renderer.
//!
//! A presentation affordance over a final string: the displayed prefix grows
//! by one character per tick until the whole text is shown. This is separate
//! from the throttled streaming path and carries no session state.

use crate::clock::Clock;
use std::time::Duration;

/// Default delay between revealed characters.
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(50);

/// Text revealed when the source is empty.
pub const DEFAULT_PLACEHOLDER: &str = "Enter your text";

#[derive(Debug, Clone)]
pub struct CharacterReveal {
    source: String,
    placeholder: String,
    /// Byte offset of the end of the revealed prefix
    revealed: usize,
}

impl CharacterReveal {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            source: text.into(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            revealed: 0,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self.revealed = 0;
        self
    }

    /// Replaces the source text.
    ///
    /// If the new text extends the current one the revealed prefix is kept;
    /// any other replacement restarts the reveal. Returns `true` on restart.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.source {
            return false;
        }
        let appended = !self.source.is_empty() && text.starts_with(self.source.as_str());
        self.source = text;
        if !appended {
            self.revealed = 0;
        }
        !appended
    }

    /// Reveals one more character. Returns the new prefix, or `None` when
    /// everything is already shown.
    pub fn tick(&mut self) -> Option<&str> {
        let target = self.target();
        let next = target[self.revealed..].chars().next()?;
        self.revealed += next.len_utf8();
        Some(&self.target()[..self.revealed])
    }

    /// The currently displayed prefix.
    pub fn displayed(&self) -> &str {
        &self.target()[..self.revealed]
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.target().len()
    }

    /// Reveals the remaining text, one character per `interval`, calling
    /// `on_frame` with each new prefix.
    pub async fn play<F>(&mut self, clock: &dyn Clock, interval: Duration, mut on_frame: F)
    where
        F: FnMut(&str) + Send,
    {
        while !self.is_complete() {
            clock.sleep(interval).await;
            if let Some(frame) = self.tick() {
                on_frame(frame);
            }
        }
    }

    fn target(&self) -> &str {
        if self.source.is_empty() {
            &self.placeholder
        } else {
            &self.source
        }
    }
}
