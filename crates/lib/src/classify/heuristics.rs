//! # Heuristic Rules
//!
//! Cheap, deterministic checks over source lines: line-length statistics,
//! auto-generation markers and the `if <n> - <n>:` obfuscation pattern.

use crate::constants::{AUTOGEN_MARKERS, OBFUSCATION_PATTERN};
use crate::errors::ClassifyError;
use regex::Regex;

/// Joins lines with single spaces, the form the text-level detectors consume.
pub fn join_lines(lines: &[String]) -> String {
    lines.join(" ")
}

/// Mean and maximum line length in characters.
///
/// An empty file has no defined mean, so it is reported as [`ClassifyError::EmptyInput`].
pub fn line_length_stats(lines: &[String]) -> Result<(f64, f64), ClassifyError> {
    if lines.is_empty() {
        return Err(ClassifyError::EmptyInput);
    }
    let lengths: Vec<usize> = lines.iter().map(|line| line.chars().count()).collect();
    let total: usize = lengths.iter().sum();
    let max = lengths.iter().copied().max().unwrap_or_default();
    Ok((total as f64 / lengths.len() as f64, max as f64))
}

/// Compiled marker and pattern rules.
#[derive(Debug, Clone)]
pub struct HeuristicRules {
    obfuscation: Regex,
    autogen_markers: Vec<String>,
}

impl HeuristicRules {
    /// Builds the rules with the default marker list and obfuscation pattern.
    pub fn new() -> Result<Self, ClassifyError> {
        Self::with_markers(AUTOGEN_MARKERS.iter().map(|m| m.to_string()).collect())
    }

    /// Builds the rules with a custom auto-generation marker list.
    pub fn with_markers(markers: Vec<String>) -> Result<Self, ClassifyError> {
        Ok(Self {
            obfuscation: Regex::new(OBFUSCATION_PATTERN)?,
            autogen_markers: markers.into_iter().map(|m| m.to_lowercase()).collect(),
        })
    }

    /// True if any marker phrase occurs in `text`, ignoring case.
    pub fn has_autogen_marker(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.autogen_markers
            .iter()
            .any(|marker| text.contains(marker.as_str()))
    }

    /// Sum over lines of non-overlapping obfuscation-pattern matches.
    pub fn count_obfuscations(&self, lines: &[String]) -> usize {
        lines
            .iter()
            .map(|line| self.obfuscation.find_iter(line).count())
            .sum()
    }
}
