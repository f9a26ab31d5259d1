//! Persisted entry module.
//!
//! - `model`: `EntryId`, `EntryRecord`, `EntryUpdate`, `ListQuery`, `HistoryEntry`
//! - `repository`: The `EntryStore` trait

mod model;
mod repository;

pub use model::{EntryId, EntryRecord, EntryStatus, EntryUpdate, HistoryEntry, ListQuery};
pub use repository::EntryStore;
