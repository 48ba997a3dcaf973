use crate::errors::ClassifyError;
use tiktoken_rs::CoreBPE;

/// Counts subword tokens in a text.
pub trait TokenCounter: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
}

/// A [`TokenCounter`] using the `cl100k_base` BPE vocabulary.
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    pub fn cl100k() -> Result<Self, ClassifyError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| ClassifyError::Tokenizer(format!("Failed to load cl100k_base: {e}")))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    /// Special-token text such as `<|endoftext|>` is counted as ordinary text.
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}
