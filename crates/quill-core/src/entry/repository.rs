//! Entry store trait.
//!
//! Defines the interface for the remote persistence collaborator.

use super::model::{EntryId, EntryRecord, EntryUpdate, ListQuery};
use crate::error::Result;
use crate::session::TransformKind;
use async_trait::async_trait;

/// An abstract store for persisted entries.
///
/// This trait decouples the session lifecycle from the concrete backend
/// (serverless HTTP functions, in-process memory).
///
/// # Implementation Notes
///
/// Every call is request/response. All calls are idempotent except `create`,
/// which inserts a new record each time it is called; callers must issue it at
/// most once per session.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Inserts a new `pending` entry.
    ///
    /// # Returns
    ///
    /// - `Ok(EntryRecord)`: The stored record, including its new id
    /// - `Err(_)`: The store rejected the entry or could not be reached
    async fn create(&self, input_text: &str, kind: TransformKind) -> Result<EntryRecord>;

    /// Applies a partial update to an entry.
    ///
    /// # Returns
    ///
    /// - `Ok(EntryRecord)`: The updated record
    /// - `Err(QuillError::NotFound)`: No entry with this id
    async fn update(&self, id: EntryId, update: EntryUpdate) -> Result<EntryRecord>;

    /// Lists entries most-recent-first.
    async fn list(&self, query: ListQuery) -> Result<Vec<EntryRecord>>;

    /// Deletes an entry.
    ///
    /// # Returns
    ///
    /// - `Ok(EntryId)`: The id of the deleted entry
    /// - `Err(QuillError::NotFound)`: No entry with this id
    async fn remove(&self, id: EntryId) -> Result<EntryId>;

    /// Fetches a single entry.
    ///
    /// # Returns
    ///
    /// - `Ok(EntryRecord)`: The entry
    /// - `Err(QuillError::NotFound)`: No entry with this id
    async fn get(&self, id: EntryId) -> Result<EntryRecord>;
}
