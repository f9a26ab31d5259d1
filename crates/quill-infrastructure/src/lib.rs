pub mod config_service;
pub mod dto;
pub mod http_entry_store;
pub mod memory_entry_store;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::http_entry_store::HttpEntryStore;
pub use crate::memory_entry_store::MemoryEntryStore;
pub use crate::paths::QuillPaths;
