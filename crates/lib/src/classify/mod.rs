//! # File Classification
//!
//! The second pass of the pipeline: compute a heuristic summary for each
//! source file. In-process checks (line lengths, language detection, markers,
//! token count) and external tools (lint, complexity metrics) are composed
//! field by field into a [`ClassificationRecord`].
//!
//! Failure handling follows one rule: if the in-process bundle fails, the whole
//! record is null; if an external tool fails, only its field is null.

pub mod batch;
pub mod guess;
pub mod heuristics;
pub mod language;
pub mod tokens;

pub use batch::{run_classification, SourceFile};
pub use guess::{KeywordLanguageGuesser, SourceLanguageGuesser};
pub use heuristics::HeuristicRules;
pub use language::{LanguageIdentifier, LanguageSpan, WhatlangIdentifier};
pub use tokens::{TiktokenCounter, TokenCounter};

use crate::{
    config::ToolConfig,
    errors::{ClassifyError, ToolError},
    tools::{CodeMetricsTool, Metric, SubprocessTools},
    types::{ClassificationFields, ClassificationRecord},
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Classifies source files using pluggable detectors and tools.
pub struct FileClassifier {
    identifier: Arc<dyn LanguageIdentifier>,
    guesser: Arc<dyn SourceLanguageGuesser>,
    tokens: Arc<dyn TokenCounter>,
    tools: Arc<dyn CodeMetricsTool>,
    metrics: Vec<Metric>,
    rules: HeuristicRules,
}

impl FileClassifier {
    pub fn builder() -> FileClassifierBuilder {
        FileClassifierBuilder::new()
    }

    /// Computes the in-process fields for a file's lines.
    ///
    /// Fails with [`ClassifyError::EmptyInput`] for an empty file, or with the
    /// error of whichever detector failed.
    pub fn classify(&self, lines: &[String]) -> Result<ClassificationFields, ClassifyError> {
        let mean_max_line_length = heuristics::line_length_stats(lines)?;
        let text = heuristics::join_lines(lines);
        let guess = self.guesser.guess(&text)?;
        let nonenglish = language::detect_nonenglish(self.identifier.as_ref(), &text)?;

        Ok(ClassificationFields {
            guess,
            nonenglish,
            mean_max_line_length,
            obfuscations: self.rules.count_obfuscations(lines),
            autogen: self.rules.has_autogen_marker(&text),
            ntokens: self.tokens.count_tokens(&text),
        })
    }

    /// Builds the full record for a file, or `None` if the in-process bundle failed.
    ///
    /// Tool failures are logged and leave only the affected field empty.
    pub async fn classify_file(
        &self,
        source: &SourceFile,
        github: Option<Value>,
    ) -> Option<ClassificationRecord> {
        let fields = match self.classify(&source.lines) {
            Ok(fields) => fields,
            Err(e) => {
                warn!("Failed to classify '{}': {e}", source.filename);
                return None;
            }
        };

        let flake8 = tool_result(
            &source.path,
            "lint",
            self.tools.lint_findings(&source.path).await,
        );
        let (mut cc, mut hal, mut raw, mut mi) = (None, None, None, None);
        for &metric in &self.metrics {
            let value = self.metric(&source.path, metric).await;
            match metric {
                Metric::Cc => cc = value,
                Metric::Hal => hal = value,
                Metric::Raw => raw = value,
                Metric::Mi => mi = value,
            }
        }

        Some(ClassificationRecord {
            filename: source.filename.clone(),
            guess: fields.guess,
            nonenglish: fields.nonenglish,
            mean_max_line_length: fields.mean_max_line_length,
            obfuscations: fields.obfuscations,
            autogen: fields.autogen,
            filesize: source.filesize,
            github,
            ntokens: fields.ntokens,
            flake8,
            cc,
            hal,
            raw,
            mi,
        })
    }

    async fn metric(&self, path: &Path, metric: Metric) -> Option<Value> {
        tool_result(path, metric.as_str(), self.tools.metric(path, metric).await)
    }
}

fn tool_result<T>(path: &Path, name: &str, result: Result<T, ToolError>) -> Option<T> {
    match result {
        Ok(value) => {
            debug!("Tool '{name}' succeeded on '{}'", path.display());
            Some(value)
        }
        Err(e) => {
            warn!("Tool '{name}' failed on '{}': {e}", path.display());
            None
        }
    }
}

/// A builder for [`FileClassifier`].
///
/// Unset components fall back to the bundled implementations: `whatlang` for
/// language identification, the keyword guesser, `cl100k_base` token counts
/// and the default lint/metrics subprocesses.
#[derive(Default)]
pub struct FileClassifierBuilder {
    identifier: Option<Arc<dyn LanguageIdentifier>>,
    guesser: Option<Arc<dyn SourceLanguageGuesser>>,
    tokens: Option<Arc<dyn TokenCounter>>,
    tools: Option<Arc<dyn CodeMetricsTool>>,
    tool_config: Option<ToolConfig>,
    metrics: Option<Vec<Metric>>,
    autogen_markers: Option<Vec<String>>,
}

impl FileClassifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language_identifier(mut self, identifier: Arc<dyn LanguageIdentifier>) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn source_guesser(mut self, guesser: Arc<dyn SourceLanguageGuesser>) -> Self {
        self.guesser = Some(guesser);
        self
    }

    pub fn token_counter(mut self, tokens: Arc<dyn TokenCounter>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Uses a custom tool implementation. Takes precedence over [`Self::tool_config`].
    pub fn tools(mut self, tools: Arc<dyn CodeMetricsTool>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Configures the default subprocess tools.
    pub fn tool_config(mut self, config: ToolConfig) -> Self {
        self.tool_config = Some(config);
        self
    }

    /// Restricts which metrics are requested. Unrequested metric fields stay null.
    pub fn metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Replaces the default auto-generation marker phrases.
    pub fn autogen_markers(mut self, markers: Vec<String>) -> Self {
        self.autogen_markers = Some(markers);
        self
    }

    /// Builds the classifier, loading default models for unset components.
    pub fn build(self) -> Result<FileClassifier, ClassifyError> {
        let identifier: Arc<dyn LanguageIdentifier> = match self.identifier {
            Some(identifier) => identifier,
            None => Arc::new(WhatlangIdentifier::default()),
        };
        let guesser: Arc<dyn SourceLanguageGuesser> = match self.guesser {
            Some(guesser) => guesser,
            None => Arc::new(KeywordLanguageGuesser::new()?),
        };
        let tokens: Arc<dyn TokenCounter> = match self.tokens {
            Some(tokens) => tokens,
            None => Arc::new(TiktokenCounter::cl100k()?),
        };
        let tools: Arc<dyn CodeMetricsTool> = match self.tools {
            Some(tools) => tools,
            None => Arc::new(SubprocessTools::new(self.tool_config.unwrap_or_default())),
        };
        let mut metrics = self.metrics.unwrap_or_else(|| Metric::ALL.to_vec());
        metrics.sort_by_key(|metric| Metric::ALL.iter().position(|m| m == metric));
        metrics.dedup();
        let rules = match self.autogen_markers {
            Some(markers) => HeuristicRules::with_markers(markers)?,
            None => HeuristicRules::new()?,
        };

        Ok(FileClassifier {
            identifier,
            guesser,
            tokens,
            tools,
            metrics,
            rules,
        })
    }
}
