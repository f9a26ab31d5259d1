//! Wire format of the serverless entry functions.
//!
//! The functions speak camelCase JSON and use the legacy prompt type names
//! (`createParagraph`, `outlineMainPoints`). These DTOs translate between that
//! format and the domain models in `quill_core::entry`.

use chrono::{DateTime, Utc};
use quill_core::entry::{EntryId, EntryRecord, EntryStatus, EntryUpdate};
use quill_core::error::{QuillError, Result};
use quill_core::session::TransformKind;
use serde::{Deserialize, Serialize};

/// Prompt type as the backend's validation schema spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptTypeDto {
    #[serde(rename = "createParagraph", alias = "expand")]
    CreateParagraph,
    #[serde(rename = "outlineMainPoints", alias = "outline")]
    OutlineMainPoints,
}

impl PromptTypeDto {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            PromptTypeDto::CreateParagraph => "createParagraph",
            PromptTypeDto::OutlineMainPoints => "outlineMainPoints",
        }
    }
}

impl From<TransformKind> for PromptTypeDto {
    fn from(kind: TransformKind) -> Self {
        match kind {
            TransformKind::Expand => PromptTypeDto::CreateParagraph,
            TransformKind::Outline => PromptTypeDto::OutlineMainPoints,
        }
    }
}

impl From<PromptTypeDto> for TransformKind {
    fn from(dto: PromptTypeDto) -> Self {
        match dto {
            PromptTypeDto::CreateParagraph => TransformKind::Expand,
            PromptTypeDto::OutlineMainPoints => TransformKind::Outline,
        }
    }
}

/// A row of `text_entries` as returned by every function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDto {
    pub id: i64,
    pub input_text: String,
    #[serde(default)]
    pub output_text: Option<String>,
    pub prompt_type: PromptTypeDto,
    /// Nullable column, defaults to `pending` in the schema
    #[serde(default)]
    pub status: Option<EntryStatus>,
    #[serde(default)]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EntryDto> for EntryRecord {
    type Error = QuillError;

    fn try_from(dto: EntryDto) -> Result<Self> {
        Ok(EntryRecord {
            id: EntryId::new(dto.id)?,
            input_text: dto.input_text,
            output_text: dto.output_text,
            kind: dto.prompt_type.into(),
            status: dto.status.unwrap_or_default(),
            error: dto.error,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        })
    }
}

impl From<&EntryRecord> for EntryDto {
    fn from(record: &EntryRecord) -> Self {
        EntryDto {
            id: record.id.get(),
            input_text: record.input_text.clone(),
            output_text: record.output_text.clone(),
            prompt_type: record.kind.into(),
            status: Some(record.status),
            error: record.error.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Body of `POST create-entry`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest<'a> {
    pub input_text: &'a str,
    pub prompt_type: PromptTypeDto,
}

/// Body of `PUT update-entry`. Absent fields are left untouched server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateEntryRequest {
    pub fn new(id: EntryId, update: EntryUpdate) -> Self {
        Self {
            id: id.get(),
            output_text: update.output_text,
            status: update.status,
            error: update.error,
        }
    }
}

/// Body returned by `GET list-entries`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEntriesResponse {
    pub entries: Vec<EntryDto>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

/// Body returned by `DELETE delete-entry`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteEntryResponse {
    #[serde(default)]
    pub success: bool,
    pub id: i64,
}

/// Error body shared by all functions.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Joins the error, message and details fields into one line.
    pub fn describe(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(error) = &self.error {
            parts.push(error.clone());
        }
        if let Some(message) = &self.message {
            parts.push(message.clone());
        }
        if let Some(details) = &self.details {
            parts.push(details.to_string());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(": "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = r#"{
        "id": 3,
        "inputText": "abc",
        "outputText": null,
        "promptType": "outlineMainPoints",
        "status": null,
        "error": null,
        "createdAt": "2025-02-01T10:00:00.000Z",
        "updatedAt": "2025-02-01T10:00:01.500Z"
    }"#;

    #[test]
    fn test_entry_dto_to_record() {
        let dto: EntryDto = serde_json::from_str(ROW).unwrap();
        let record = EntryRecord::try_from(dto).unwrap();

        assert_eq!(record.id.get(), 3);
        assert_eq!(record.kind, TransformKind::Outline);
        assert_eq!(record.status, EntryStatus::Pending);
        assert!(record.output_text.is_none());
        assert!(record.updated_at > record.created_at);
    }

    #[test]
    fn test_entry_dto_rejects_non_positive_id() {
        let dto: EntryDto = serde_json::from_str(&ROW.replace("\"id\": 3", "\"id\": 0")).unwrap();
        assert!(EntryRecord::try_from(dto).is_err());
    }

    #[test]
    fn test_create_request_uses_legacy_prompt_type() {
        let body = CreateEntryRequest {
            input_text: "abc",
            prompt_type: TransformKind::Expand.into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "inputText": "abc", "promptType": "createParagraph" })
        );
    }

    #[test]
    fn test_update_request_omits_absent_fields() {
        let id = EntryId::new(1).unwrap();
        let json = serde_json::to_value(UpdateEntryRequest::new(
            id,
            EntryUpdate::completed("Hello"),
        ))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 1, "outputText": "Hello", "status": "completed" })
        );
    }

    #[test]
    fn test_error_response_describe() {
        let body: ErrorResponse = serde_json::from_str(
            r#"{"error":"Internal server error","message":"DATABASE_URL is not defined"}"#,
        )
        .unwrap();
        assert_eq!(
            body.describe().as_deref(),
            Some("Internal server error: DATABASE_URL is not defined")
        );
    }
}
