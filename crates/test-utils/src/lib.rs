use anyhow::Result;
use async_trait::async_trait;
use codeprep::classify::{LanguageIdentifier, LanguageSpan, SourceLanguageGuesser, TokenCounter};
use codeprep::errors::{ClassifyError, ToolError};
use codeprep::tools::{CodeMetricsTool, Metric};
use codeprep::FileClassifier;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// --- Fixtures ---

/// Writes `content` to `dir/relative`, creating parent directories.
pub fn write_fixture(dir: &Path, relative: &str, content: impl AsRef<[u8]>) -> Result<PathBuf> {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}

/// Converts string literals into owned lines.
pub fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// --- Mock Detectors ---

/// Reports one span per configured label, regardless of input.
#[derive(Clone, Debug, Default)]
pub struct MockLanguageIdentifier {
    labels: Vec<String>,
}

impl MockLanguageIdentifier {
    pub fn new(labels: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LanguageIdentifier for MockLanguageIdentifier {
    fn identify(&self, text: &str) -> Result<Vec<LanguageSpan>, ClassifyError> {
        Ok(self
            .labels
            .iter()
            .map(|label| LanguageSpan {
                label: label.clone(),
                confidence: 1.0,
                len: text.len(),
            })
            .collect())
    }
}

/// Always fails, for exercising the null-record path.
#[derive(Clone, Debug, Default)]
pub struct FailingLanguageIdentifier;

impl LanguageIdentifier for FailingLanguageIdentifier {
    fn identify(&self, _text: &str) -> Result<Vec<LanguageSpan>, ClassifyError> {
        Err(ClassifyError::LanguageIdentification(
            "model unavailable".to_string(),
        ))
    }
}

/// Always guesses the configured language.
#[derive(Clone, Debug)]
pub struct FixedGuesser(pub String);

impl SourceLanguageGuesser for FixedGuesser {
    fn guess(&self, _text: &str) -> Result<String, ClassifyError> {
        Ok(self.0.clone())
    }
}

/// Counts whitespace-separated words as tokens.
#[derive(Clone, Debug, Default)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

// --- Mock Metrics Tool ---

/// A programmable [`CodeMetricsTool`] that records the calls it receives.
///
/// Anything not programmed fails as if the tool were not installed.
#[derive(Clone, Debug, Default)]
pub struct MockMetricsTool {
    lint: Arc<Mutex<Option<usize>>>,
    metrics: Arc<Mutex<HashMap<Metric, Value>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockMetricsTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tool where every invocation fails.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn set_lint_findings(&self, count: usize) {
        *self.lint.lock().unwrap() = Some(count);
    }

    pub fn add_metric(&self, metric: Metric, value: Value) {
        self.metrics.lock().unwrap().insert(metric, value);
    }

    /// Recorded calls as `"<tool> <path>"` strings.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, name: &str, path: &Path) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{name} {}", path.display()));
    }
}

fn not_installed(name: &str) -> ToolError {
    ToolError::Spawn {
        command: name.to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "mock tool not programmed"),
    }
}

#[async_trait]
impl CodeMetricsTool for MockMetricsTool {
    async fn lint_findings(&self, path: &Path) -> Result<usize, ToolError> {
        self.record("lint", path);
        let lint = *self.lint.lock().unwrap();
        lint.ok_or_else(|| not_installed("lint"))
    }

    async fn metric(&self, path: &Path, metric: Metric) -> Result<Value, ToolError> {
        self.record(metric.as_str(), path);
        let value = self.metrics.lock().unwrap().get(&metric).cloned();
        value.ok_or_else(|| not_installed(metric.as_str()))
    }
}

// --- Classifier Setup ---

/// A classifier built entirely from mocks: English-only text, `Python` guesses,
/// word-count tokens and the given tool.
pub fn mock_classifier(tools: MockMetricsTool) -> Result<FileClassifier> {
    Ok(FileClassifier::builder()
        .language_identifier(Arc::new(MockLanguageIdentifier::new(&["ENGLISH"])))
        .source_guesser(Arc::new(FixedGuesser("Python".to_string())))
        .token_counter(Arc::new(WordCounter))
        .tools(Arc::new(tools))
        .build()?)
}
