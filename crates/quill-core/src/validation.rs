//! Input limits enforced before any network call.

use crate::error::{QuillError, Result};

/// Longest accepted input, in characters.
pub const MAX_INPUT_CHARS: usize = 10_000;

/// Largest page a list call may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Checks that `text` is non-blank and at most [`MAX_INPUT_CHARS`] long.
pub fn validate_input_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(QuillError::validation("Input text is required"));
    }
    let chars = text.chars().count();
    if chars > MAX_INPUT_CHARS {
        return Err(QuillError::validation(format!(
            "Input text is too long ({chars} characters, max {MAX_INPUT_CHARS})"
        )));
    }
    Ok(())
}
