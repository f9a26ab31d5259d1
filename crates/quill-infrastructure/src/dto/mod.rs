//! Data transfer objects for remote storage formats.

pub mod entry;

pub use entry::{
    CreateEntryRequest, DeleteEntryResponse, EntryDto, ErrorResponse, ListEntriesResponse,
    PromptTypeDto, UpdateEntryRequest,
};
