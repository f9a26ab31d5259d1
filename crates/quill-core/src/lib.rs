pub mod clock;
pub mod config;
pub mod entry;
pub mod error;
pub mod generation;
pub mod render;
pub mod session;
pub mod stream;
pub mod validation;

// Re-export common error type
pub use error::{QuillError, Result};
