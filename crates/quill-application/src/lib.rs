//! Application layer for Quill.
//!
//! This crate drives the generation-session lifecycle: it applies the core
//! state machine, performs the store and channel calls at each transition and
//! keeps the history list in step with the store.

pub mod active_slot;
pub mod display;
pub mod prompt;
pub mod session;

pub use active_slot::ActiveSlot;
pub use display::DisplaySink;
pub use prompt::TemplatePromptBuilder;
pub use session::{HistorySynchronizer, SessionController};
