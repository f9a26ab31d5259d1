use crate::entry::EntryId;
use chrono::{DateTime, Utc};

/// Inputs to the session state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The user submitted the session's input.
    Submit,
    /// The persistence store accepted the create call.
    Created {
        id: EntryId,
        created_at: Option<DateTime<Utc>>,
    },
    /// The create call failed; no generation will be attempted.
    CreateFailed { reason: String },
    /// One incremental piece of generated text.
    Fragment(String),
    /// The generation channel ended normally.
    StreamEnded,
    /// The generation channel could not be opened or errored mid-stream.
    StreamFailed { reason: String },
}

impl SessionEvent {
    /// Short name used in logs and transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Submit => "submit",
            SessionEvent::Created { .. } => "created",
            SessionEvent::CreateFailed { .. } => "create_failed",
            SessionEvent::Fragment(_) => "fragment",
            SessionEvent::StreamEnded => "stream_ended",
            SessionEvent::StreamFailed { .. } => "stream_failed",
        }
    }
}
