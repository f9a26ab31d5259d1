//! Display sink contract.

use quill_core::session::SessionState;

/// Receives what the user should see.
///
/// Calls are made while the active slot is locked, so implementations must
/// not block for long.
pub trait DisplaySink: Send + Sync {
    /// Shows `text` as the current output. `is_final` is set on the flush that
    /// ends a stream and on re-entered sessions.
    fn render(&self, text: &str, is_final: bool);

    /// The active session moved to `state`.
    fn state_changed(&self, state: SessionState);

    /// A non-fatal problem the user should know about.
    fn notice(&self, message: &str);

    /// Blanks the output area.
    fn clear(&self);
}
