//! Persisted entry models.
//!
//! These are the store-side views of a session: the full `EntryRecord`, the
//! partial `EntryUpdate` sent at terminal transitions, and the read-only
//! `HistoryEntry` shown in the history list.

use crate::error::{QuillError, Result};
use crate::session::TransformKind;
use crate::validation::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::Display;

/// Identifier assigned by the persistence store (always positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct EntryId(i64);

impl EntryId {
    /// Wraps a raw id, rejecting zero and negative values.
    pub fn new(value: i64) -> Result<Self> {
        if value <= 0 {
            return Err(QuillError::validation(format!(
                "entry id must be a positive integer, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for EntryId {
    type Error = QuillError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<EntryId> for i64 {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = QuillError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| QuillError::validation(format!("invalid entry id '{s}'")))?;
        Self::new(value)
    }
}

/// Status column of a persisted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Pending,
    Completed,
    Error,
}

/// A persisted entry as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: EntryId,
    pub input_text: String,
    pub output_text: Option<String>,
    pub kind: TransformKind,
    pub status: EntryStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of an entry. `None` fields are left untouched by the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntryUpdate {
    pub output_text: Option<String>,
    pub status: Option<EntryStatus>,
    pub error: Option<String>,
}

impl EntryUpdate {
    /// Update sent when a generation ends normally.
    pub fn completed(output_text: impl Into<String>) -> Self {
        Self {
            output_text: Some(output_text.into()),
            status: Some(EntryStatus::Completed),
            error: None,
        }
    }

    /// Update sent when a generation fails; the partial output is kept.
    pub fn failed(partial_output: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            output_text: Some(partial_output.into()),
            status: Some(EntryStatus::Error),
            error: Some(error.into()),
        }
    }
}

/// Page request for `EntryStore::list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub limit: u32,
    pub offset: u32,
    pub kind: Option<TransformKind>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
            kind: None,
        }
    }
}

impl ListQuery {
    /// First page of the given size.
    pub fn first_page(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: Option<TransformKind>) -> Self {
        self.kind = kind;
        self
    }

    /// Checks `1 <= limit <= MAX_PAGE_LIMIT`.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 || self.limit > MAX_PAGE_LIMIT {
            return Err(QuillError::validation(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}, got {}",
                self.limit
            )));
        }
        Ok(())
    }
}

/// Read-only summary of a persisted entry for the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    /// Input text truncated for display
    pub preview: String,
    pub kind: TransformKind,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Projects a record, truncating its input to `preview_chars` characters.
    pub fn from_record(record: &EntryRecord, preview_chars: usize) -> Self {
        Self {
            id: record.id,
            preview: truncate_preview(&record.input_text, preview_chars),
            kind: record.kind,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

fn truncate_preview(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut preview: String = single_line.chars().take(max_chars).collect();
    preview.push('…');
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_rejects_non_positive() {
        assert!(EntryId::new(0).is_err());
        assert!(EntryId::new(-3).is_err());
        assert_eq!(EntryId::new(5).unwrap().get(), 5);
        assert!("abc".parse::<EntryId>().is_err());
        assert_eq!(" 12 ".parse::<EntryId>().unwrap().get(), 12);
    }

    #[test]
    fn test_entry_id_deserialization_validates() {
        assert!(serde_json::from_str::<EntryId>("0").is_err());
        assert_eq!(serde_json::from_str::<EntryId>("9").unwrap().get(), 9);
    }

    #[test]
    fn test_list_query_limit_bounds() {
        assert!(ListQuery::default().validate().is_ok());
        assert!(ListQuery::first_page(0).validate().is_err());
        assert!(ListQuery::first_page(100).validate().is_ok());
        assert!(ListQuery::first_page(101).validate().is_err());
    }

    #[test]
    fn test_history_preview_truncates_on_char_boundary() {
        let record = EntryRecord {
            id: EntryId::new(1).unwrap(),
            input_text: "Καλημέρα   κόσμε\nαπό εδώ".to_string(),
            output_text: None,
            kind: TransformKind::Expand,
            status: EntryStatus::Pending,
            error: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let entry = HistoryEntry::from_record(&record, 8);
        assert_eq!(entry.preview, "Καλημέρα…");

        let entry = HistoryEntry::from_record(&record, 100);
        assert_eq!(entry.preview, "Καλημέρα κόσμε από εδώ");
    }

    #[test]
    fn test_failed_update_keeps_partial_output() {
        let update = EntryUpdate::failed("Par", "stream reset");
        assert_eq!(update.output_text.as_deref(), Some("Par"));
        assert_eq!(update.status, Some(EntryStatus::Error));
        assert_eq!(update.error.as_deref(), Some("stream reset"));
    }
}
