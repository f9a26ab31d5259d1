/// Accumulates generated fragments into a single growing string.
///
/// Fragments are appended exactly in delivery order; nothing is reordered or
/// deduplicated. The character count is tracked alongside the text so callers
/// can measure backlog in characters without rescanning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentBuffer {
    text: String,
    chars: usize,
}

impl FragmentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment and returns the current total.
    pub fn append(&mut self, fragment: &str) -> &str {
        self.text.push_str(fragment);
        self.chars += fragment.chars().count();
        &self.text
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.chars = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_running_total() {
        let mut buffer = FragmentBuffer::new();
        assert_eq!(buffer.append("He"), "He");
        assert_eq!(buffer.append("llo"), "Hello");
        assert_eq!(buffer.char_count(), 5);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut buffer = FragmentBuffer::new();
        buffer.append("ab");
        buffer.append("ab");
        assert_eq!(buffer.as_str(), "abab");
    }

    #[test]
    fn test_char_count_is_not_byte_length() {
        let mut buffer = FragmentBuffer::new();
        buffer.append("λόγος");
        assert_eq!(buffer.char_count(), 5);
        assert!(buffer.as_str().len() > 5);

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.char_count(), 0);
    }
}
