//! In-process `EntryStore`.
//!
//! Mirrors the behaviour of the HTTP functions (serial ids, `pending` on
//! create, newest-first listing, NotFound on missing ids) without a network.
//! Used by the CLI's offline mode and as a fixture in tests.

use async_trait::async_trait;
use chrono::Utc;
use quill_core::entry::{EntryId, EntryRecord, EntryStatus, EntryStore, EntryUpdate, ListQuery};
use quill_core::error::{QuillError, Result};
use quill_core::session::TransformKind;
use quill_core::validation::validate_input_text;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    next_id: i64,
    entries: BTreeMap<EntryId, EntryRecord>,
}

/// Entry store kept in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryEntryStore {
    inner: RwLock<Inner>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn create(&self, input_text: &str, kind: TransformKind) -> Result<EntryRecord> {
        validate_input_text(input_text)?;

        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = EntryId::new(inner.next_id)?;
        let now = Utc::now();
        let record = EntryRecord {
            id,
            input_text: input_text.to_string(),
            output_text: None,
            kind,
            status: EntryStatus::Pending,
            error: None,
            created_at: now,
            updated_at: now,
        };
        inner.entries.insert(id, record.clone());

        tracing::debug!(entry_id = %id, "[MemoryEntryStore] Created entry");
        Ok(record)
    }

    async fn update(&self, id: EntryId, update: EntryUpdate) -> Result<EntryRecord> {
        let mut inner = self.inner.write().await;
        let record = inner
            .entries
            .get_mut(&id)
            .ok_or_else(|| QuillError::not_found("Entry", id))?;

        if let Some(output_text) = update.output_text {
            record.output_text = Some(output_text);
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(error) = update.error {
            record.error = Some(error);
        }
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn list(&self, query: ListQuery) -> Result<Vec<EntryRecord>> {
        query.validate()?;

        let inner = self.inner.read().await;
        let mut records: Vec<EntryRecord> = inner
            .entries
            .values()
            .filter(|record| query.kind.is_none_or(|kind| record.kind == kind))
            .cloned()
            .collect();
        // newest first; ids break ties between entries created in the same instant
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(records
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn remove(&self, id: EntryId) -> Result<EntryId> {
        let mut inner = self.inner.write().await;
        inner
            .entries
            .remove(&id)
            .map(|record| record.id)
            .ok_or_else(|| QuillError::not_found("Entry", id))
    }

    async fn get(&self, id: EntryId) -> Result<EntryRecord> {
        let inner = self.inner.read().await;
        inner
            .entries
            .get(&id)
            .cloned()
            .ok_or_else(|| QuillError::not_found("Entry", id))
    }
}
