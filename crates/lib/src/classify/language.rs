//! # Natural-Language Identification
//!
//! Detects which human languages appear in a file's text, used to flag files
//! whose comments or strings are not written in English.

use crate::constants::{ENGLISH_LANGUAGE, UNKNOWN_LANGUAGE};
use crate::errors::ClassifyError;
use serde::{Deserialize, Serialize};

/// A run of text attributed to one language.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LanguageSpan {
    /// Upper-case English language name (`ENGLISH`, `FRENCH`, ...) or `Unknown`.
    pub label: String,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f64,
    /// Length of the span in bytes.
    pub len: usize,
}

/// Identifies the natural languages present in a text.
pub trait LanguageIdentifier: Send + Sync {
    /// Splits `text` into weighted language spans.
    fn identify(&self, text: &str) -> Result<Vec<LanguageSpan>, ClassifyError>;
}

/// Returns whether any span is neither English nor unknown, plus the offending labels in order.
pub fn detect_nonenglish(
    identifier: &dyn LanguageIdentifier,
    text: &str,
) -> Result<(bool, Vec<String>), ClassifyError> {
    let nonenglish: Vec<String> = identifier
        .identify(text)?
        .into_iter()
        .filter(|span| span.label != ENGLISH_LANGUAGE && span.label != UNKNOWN_LANGUAGE)
        .map(|span| span.label)
        .collect();
    Ok((!nonenglish.is_empty(), nonenglish))
}

/// A [`LanguageIdentifier`] backed by the `whatlang` trigram model.
///
/// `whatlang` reports a single language per call, so the text is cut into
/// windows of whitespace-separated words and each window is detected on its
/// own. Adjacent windows with the same label are merged into one span.
#[derive(Debug, Clone)]
pub struct WhatlangIdentifier {
    window_words: usize,
    min_confidence: f64,
}

impl Default for WhatlangIdentifier {
    fn default() -> Self {
        Self {
            window_words: 64,
            min_confidence: 0.5,
        }
    }
}

impl WhatlangIdentifier {
    pub fn new(window_words: usize, min_confidence: f64) -> Self {
        Self {
            window_words: window_words.max(1),
            min_confidence,
        }
    }

    fn detect_window(&self, window: &str) -> LanguageSpan {
        let (label, confidence) = match whatlang::detect(window) {
            Some(info) if info.is_reliable() && info.confidence() >= self.min_confidence => {
                (info.lang().eng_name().to_uppercase(), info.confidence())
            }
            Some(info) => (UNKNOWN_LANGUAGE.to_string(), info.confidence()),
            None => (UNKNOWN_LANGUAGE.to_string(), 0.0),
        };
        LanguageSpan {
            label,
            confidence,
            len: window.len(),
        }
    }
}

impl LanguageIdentifier for WhatlangIdentifier {
    fn identify(&self, text: &str) -> Result<Vec<LanguageSpan>, ClassifyError> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut spans: Vec<LanguageSpan> = Vec::new();

        for chunk in words.chunks(self.window_words) {
            let span = self.detect_window(&chunk.join(" "));
            match spans.last_mut() {
                Some(last) if last.label == span.label => {
                    let total = last.len + span.len;
                    last.confidence = (last.confidence * last.len as f64
                        + span.confidence * span.len as f64)
                        / total.max(1) as f64;
                    last.len = total;
                }
                _ => spans.push(span),
            }
        }

        Ok(spans)
    }
}
