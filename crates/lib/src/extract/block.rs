//! # Block Extractor
//!
//! Recovers the source file embedded in a model answer by scanning for the
//! first fenced code block. Lines echoing the transcript key are dropped
//! wherever they appear, since models sometimes repeat the prompt identifier
//! inside the code they return.

use crate::constants::FENCE_MARKER;

/// Scanner state while walking the answer line by line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Before the opening fence.
    Searching,
    /// Between the opening fence and the closing fence.
    Recording,
}

pub struct BlockExtractor;

impl BlockExtractor {
    /// Returns the lines of the first fenced block in `text`, skipping any line
    /// that contains `key`.
    ///
    /// The opening fence may carry a language tag (```` ```python ````) and so may
    /// the closing one. Everything after the closing fence is discarded. If the
    /// block is never closed, all lines after the opening fence are returned,
    /// which keeps truncated answers usable. Without an opening fence the result
    /// is empty.
    pub fn extract(text: &str, key: &str) -> Vec<String> {
        let mut state = ScanState::Searching;
        let mut code = Vec::new();

        for line in text.split('\n') {
            if line.contains(key) {
                continue;
            }
            let is_fence = line.starts_with(FENCE_MARKER);
            match state {
                ScanState::Searching if is_fence => state = ScanState::Recording,
                ScanState::Searching => {}
                ScanState::Recording if is_fence => break,
                ScanState::Recording => code.push(line.to_string()),
            }
        }

        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_fence_with_language_tag_is_not_recorded() {
        let text = "```rust\nfn main() {}\n```rust";
        assert_eq!(BlockExtractor::extract(text, "KEY"), vec!["fn main() {}"]);
    }

    #[test]
    fn test_fence_must_start_the_line() {
        let text = "  ```\nx = 1\n```\ny = 2\n```";
        assert_eq!(BlockExtractor::extract(text, "KEY"), vec!["y = 2"]);
    }

    #[test]
    fn test_key_on_fence_line_hides_the_fence() {
        let text = "```KEY\nnot code\n```\ncode\n```";
        assert_eq!(BlockExtractor::extract(text, "KEY"), vec!["code"]);
    }

    #[test]
    fn test_carriage_returns_are_kept_verbatim() {
        let text = "```\r\nx = 1\r\n```";
        assert_eq!(BlockExtractor::extract(text, "KEY"), vec!["x = 1\r"]);
    }
}
