//! Incremental line splitting for chunked NDJSON bodies.
//!
//! The transport hands the response body over as arbitrary byte chunks; a
//! record can be split anywhere, including in the middle of a multi-byte
//! UTF-8 sequence. [`LineDecoder`] holds the not-yet-terminated tail across
//! suspension points as raw bytes and only decodes text once a full
//! newline-terminated record is available, so chunk boundaries can never
//! corrupt a record.

/// Explicit append/split/retain-tail buffer for newline-delimited records.
///
/// ```rust
/// use flowloom::run::LineDecoder;
///
/// let mut decoder = LineDecoder::new();
/// assert!(decoder.feed(b"{\"type\":\"sta").is_empty());
/// assert_eq!(decoder.feed(b"rt\"}\n"), vec!["{\"type\":\"start\"}".to_string()]);
/// assert_eq!(decoder.finish(), None);
/// ```
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and drain every complete record it finishes.
    ///
    /// Each returned string is one newline-terminated record, delimiter
    /// stripped, decoded lossily (the runner emits UTF-8; anything else is
    /// a malformed record and fails JSON parsing downstream anyway).
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut records = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop(); // the delimiter
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            records.push(String::from_utf8_lossy(&line).into_owned());
        }
        records
    }

    /// Take the trailing unterminated fragment, if any.
    ///
    /// Called once after the transport signals end-of-stream to recover a
    /// final record emitted without a trailing delimiter.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let tail = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&tail).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chunk_with_multiple_records() {
        let mut decoder = LineDecoder::new();
        let records = decoder.feed(b"one\ntwo\nthree\n");
        assert_eq!(records, vec!["one", "two", "three"]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn tail_is_retained_across_feeds() {
        let mut decoder = LineDecoder::new();
        assert_eq!(decoder.feed(b"alpha\nbet"), vec!["alpha"]);
        assert_eq!(decoder.feed(b"a\n"), vec!["beta"]);
    }

    #[test]
    fn split_inside_multibyte_utf8_is_safe() {
        let text = "{\"result\":\"héllo\"}\n".as_bytes();
        // Split in the middle of the two-byte 'é'.
        let split = text.iter().position(|&b| b == 0xc3).unwrap() + 1;
        let mut decoder = LineDecoder::new();
        assert!(decoder.feed(&text[..split]).is_empty());
        let records = decoder.feed(&text[split..]);
        assert_eq!(records, vec!["{\"result\":\"héllo\"}"]);
    }

    #[test]
    fn crlf_delimiters_are_stripped() {
        let mut decoder = LineDecoder::new();
        assert_eq!(decoder.feed(b"one\r\ntwo\n"), vec!["one", "two"]);
    }

    #[test]
    fn finish_returns_unterminated_fragment_once() {
        let mut decoder = LineDecoder::new();
        decoder.feed(b"complete\npartial");
        assert_eq!(decoder.finish(), Some("partial".to_string()));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn empty_lines_come_through_as_empty_records() {
        let mut decoder = LineDecoder::new();
        // The reconciler skips them; the decoder just splits.
        assert_eq!(decoder.feed(b"\n\nx\n"), vec!["", "", "x"]);
    }
}
