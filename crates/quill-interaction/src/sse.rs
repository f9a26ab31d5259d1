//! Minimal server-sent-events line decoder.
//!
//! Chunks from the HTTP body can split lines (and UTF-8 sequences) anywhere,
//! so bytes are buffered until a full line is available. Only `data:` lines
//! are surfaced; comments, `event:` and `id:` lines are ignored.

#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns the `data:` payloads completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(newline) = self.pending.iter().position(|byte| *byte == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            if let Some(payload) = data_payload(&line) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Flushes a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.pending);
        data_payload(&line)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches(['\r', '\n']);
    let payload = line.strip_prefix("data:")?;
    let payload = payload.strip_prefix(' ').unwrap_or(payload);
    if payload.is_empty() {
        None
    } else {
        Some(payload.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"a\"").is_empty());
        assert_eq!(decoder.push(b":1}\r\n\r\ndata: {\"b\":2}\n"), vec![
            "{\"a\":1}".to_string(),
            "{\"b\":2}".to_string()
        ]);
    }

    #[test]
    fn test_multibyte_char_split_between_chunks() {
        let mut decoder = SseDecoder::new();
        let bytes = "data: λ\n".as_bytes();
        // split inside the two-byte lambda
        assert!(decoder.push(&bytes[..7]).is_empty());
        assert_eq!(decoder.push(&bytes[7..]), vec!["λ".to_string()]);
    }

    #[test]
    fn test_non_data_lines_are_ignored() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b": keep-alive\nevent: message\nid: 4\ndata:\ndata: x\n");
        assert_eq!(payloads, vec!["x".to_string()]);
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish().as_deref(), Some("tail"));
        assert!(decoder.finish().is_none());
    }
}
