//! History synchronizer.
//!
//! Keeps the in-memory list of past entries in step with the store. The list
//! is only ever replaced wholesale, never patched.

use crate::active_slot::SharedSlot;
use crate::display::DisplaySink;
use quill_core::entry::{EntryId, EntryStore, HistoryEntry, ListQuery};
use quill_core::error::{QuillError, Result};
use quill_core::session::{SessionState, TransformKind};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct HistorySynchronizer {
    store: Arc<dyn EntryStore>,
    slot: SharedSlot,
    sink: Arc<dyn DisplaySink>,
    entries: RwLock<Vec<HistoryEntry>>,
    query: RwLock<ListQuery>,
    preview_chars: usize,
}

impl HistorySynchronizer {
    pub fn new(
        store: Arc<dyn EntryStore>,
        slot: SharedSlot,
        sink: Arc<dyn DisplaySink>,
        page_size: u32,
        preview_chars: usize,
    ) -> Self {
        Self {
            store,
            slot,
            sink,
            entries: RwLock::new(Vec::new()),
            query: RwLock::new(ListQuery::first_page(page_size)),
            preview_chars,
        }
    }

    /// Initial load.
    pub async fn mount(&self) -> Result<Vec<HistoryEntry>> {
        tracing::debug!("[HistorySynchronizer] Mounting");
        self.refresh().await
    }

    /// Restricts subsequent refreshes to one kind, or lifts the filter.
    pub async fn set_kind_filter(&self, kind: Option<TransformKind>) {
        let mut query = self.query.write().await;
        *query = query.with_kind(kind);
    }

    /// Fetches the first page and swaps it in.
    ///
    /// # Errors
    ///
    /// - `QuillError::Validation` if the configured page size is out of range
    /// - `QuillError::PersistenceSync` if the list call fails; the current
    ///   list is kept
    pub async fn refresh(&self) -> Result<Vec<HistoryEntry>> {
        let query = *self.query.read().await;
        query.validate()?;

        let records = self
            .store
            .list(query)
            .await
            .map_err(|err| QuillError::persistence_sync(format!("list: {}", err.reason())))?;

        let entries: Vec<HistoryEntry> = records
            .iter()
            .map(|record| HistoryEntry::from_record(record, self.preview_chars))
            .collect();

        tracing::debug!(
            count = entries.len(),
            "[HistorySynchronizer] Refreshed history"
        );
        *self.entries.write().await = entries.clone();
        Ok(entries)
    }

    /// Snapshot of the current list.
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.clone()
    }

    /// Deletes an entry and refreshes.
    ///
    /// Deleting the active session's entry resets the active slot and blanks
    /// the display. On failure the list is left as it was and a notice is
    /// shown; the store's error is returned. A refresh failure after the
    /// delete only produces a notice, and the returned list is the last one
    /// loaded.
    pub async fn remove(&self, id: EntryId) -> Result<Vec<HistoryEntry>> {
        if let Err(err) = self.store.remove(id).await {
            tracing::warn!(entry_id = %id, error = %err, "[HistorySynchronizer] Delete failed");
            self.sink
                .notice(&format!("Could not delete entry {id}: {}", err.reason()));
            return Err(err);
        }
        tracing::info!(entry_id = %id, "[HistorySynchronizer] Deleted entry");

        {
            let mut slot = self.slot.lock().await;
            if slot.active_id() == Some(id) {
                slot.clear();
                self.sink.clear();
                self.sink.state_changed(SessionState::Idle);
            }
        }

        self.refresh_or_notify().await;
        Ok(self.entries().await)
    }

    /// Refresh whose failure is reported instead of returned.
    pub(crate) async fn refresh_or_notify(&self) {
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "[HistorySynchronizer] Refresh failed");
            self.sink
                .notice(&format!("Could not refresh history: {}", err.reason()));
        }
    }
}
