//! Session domain model.
//!
//! A `Session` is one user-initiated transform request and its lifecycle from
//! submission to terminal outcome. Fields are private so the lifecycle
//! invariants can only be changed through [`Session::apply`].

use crate::entry::{EntryId, EntryRecord};
use crate::stream::FragmentBuffer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The closed set of transformations a user can request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// Refine the input into one cohesive academic paragraph
    #[serde(alias = "createParagraph")]
    #[strum(to_string = "expand", serialize = "createParagraph")]
    Expand,
    /// Extract the main points as a numbered list
    #[serde(alias = "outlineMainPoints")]
    #[strum(to_string = "outline", serialize = "outlineMainPoints")]
    Outline,
}

impl TransformKind {
    /// Label shown on the action that triggers this kind.
    pub fn label(&self) -> &'static str {
        match self {
            TransformKind::Expand => "Create paragraph",
            TransformKind::Outline => "Outline main points",
        }
    }
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    Idle,
    Creating,
    Generating,
    Completed,
    Failed,
}

impl SessionState {
    /// `Completed` and `Failed` accept no further events.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Failed)
    }
}

/// Represents one generation request in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub(crate) id: Option<EntryId>,
    pub(crate) input_text: String,
    pub(crate) kind: TransformKind,
    pub(crate) state: SessionState,
    pub(crate) buffer: FragmentBuffer,
    pub(crate) error_detail: Option<String>,
    pub(crate) created_at: Option<DateTime<Utc>>,
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates an `Idle` session for the given input.
    pub fn new(input_text: impl Into<String>, kind: TransformKind) -> Self {
        Self {
            id: None,
            input_text: input_text.into(),
            kind,
            state: SessionState::Idle,
            buffer: FragmentBuffer::new(),
            error_detail: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Rebuilds a session from a persisted record.
    ///
    /// The result is always `Completed`: a re-entered session is shown, never
    /// regenerated.
    pub fn from_record(record: &EntryRecord) -> Self {
        let mut buffer = FragmentBuffer::new();
        if let Some(output) = &record.output_text {
            buffer.append(output);
        }

        Self {
            id: Some(record.id),
            input_text: record.input_text.clone(),
            kind: record.kind,
            state: SessionState::Completed,
            buffer,
            error_detail: None,
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
        }
    }

    pub fn id(&self) -> Option<EntryId> {
        self.id
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Text accumulated from the generation channel so far.
    pub fn accumulated_text(&self) -> &str {
        self.buffer.as_str()
    }

    /// Character count of the accumulated text.
    pub fn accumulated_chars(&self) -> usize {
        self.buffer.char_count()
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Copies the store-owned timestamps from a record of this session.
    ///
    /// Ignores records with a different id.
    pub fn sync_timestamps(&mut self, record: &EntryRecord) {
        if self.id == Some(record.id) {
            self.created_at = Some(record.created_at);
            self.updated_at = Some(record.updated_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryStatus;
    use std::str::FromStr;

    fn record(id: i64, output: Option<&str>, status: EntryStatus) -> EntryRecord {
        EntryRecord {
            id: EntryId::new(id).unwrap(),
            input_text: "abc".to_string(),
            output_text: output.map(str::to_string),
            kind: TransformKind::Outline,
            status,
            error: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_transform_kind_accepts_legacy_names() {
        assert_eq!(
            TransformKind::from_str("createParagraph").unwrap(),
            TransformKind::Expand
        );
        assert_eq!(TransformKind::from_str("outline").unwrap(), TransformKind::Outline);
        assert_eq!(TransformKind::Expand.to_string(), "expand");

        let parsed: TransformKind = serde_json::from_str("\"outlineMainPoints\"").unwrap();
        assert_eq!(parsed, TransformKind::Outline);
        assert_eq!(serde_json::to_string(&TransformKind::Outline).unwrap(), "\"outline\"");
    }

    #[test]
    fn test_new_session_is_idle_without_id() {
        let session = Session::new("abc", TransformKind::Expand);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.id().is_none());
        assert_eq!(session.accumulated_text(), "");
    }

    #[test]
    fn test_from_record_is_completed() {
        let session = Session::from_record(&record(7, Some("Hello"), EntryStatus::Error));
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.id().map(|id| id.get()), Some(7));
        assert_eq!(session.accumulated_text(), "Hello");
        assert!(session.error_detail().is_none());
        assert!(session.created_at().is_some());
    }

    #[test]
    fn test_sync_timestamps_ignores_other_ids() {
        let mut session = Session::from_record(&record(1, None, EntryStatus::Completed));
        let before = session.updated_at();
        let mut other = record(2, None, EntryStatus::Completed);
        other.updated_at = Utc::now() + chrono::Duration::seconds(60);
        session.sync_timestamps(&other);
        assert_eq!(session.updated_at(), before);
    }
}
