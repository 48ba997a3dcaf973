//! # Pipeline Configuration
//!
//! Plain configuration structs for the extraction and classification runs and
//! for the external tool collaborators. The CLI fills these from flags and
//! environment variables; tests build them directly.

use crate::constants::{
    DEFAULT_CODEINFO_FILE, DEFAULT_LINT_COMMAND, DEFAULT_MAX_FILES, DEFAULT_METRICS_COMMAND,
    DEFAULT_RAW_OUTPUT_DIR, DEFAULT_SELECTED_FILE, DEFAULT_SKIP_MARKERS, DEFAULT_TOOL_TIMEOUT_SECS,
    DEFAULT_TRANSCRIPTS_FILE, GITHUB_DATASET, RAW_SOURCE_TOKEN,
};
use std::path::PathBuf;
use std::time::Duration;

/// How the lint and metrics tools are invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub lint_command: String,
    pub metrics_command: String,
    /// Upper bound for a single invocation. Expiry counts as a failed invocation.
    pub timeout: Duration,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            lint_command: DEFAULT_LINT_COMMAND.to_string(),
            metrics_command: DEFAULT_METRICS_COMMAND.to_string(),
            timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
        }
    }
}

/// Settings for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// JSON transcript collection.
    pub input: PathBuf,
    /// JSON mapping from transcript key to source metadata.
    pub metadata: PathBuf,
    /// Base directory that relative output paths are resolved against.
    pub output_dir: PathBuf,
    /// Path token in the metadata filename that identifies the source dataset.
    pub source_label: String,
    /// Replacement for `source_label` in extracted file paths.
    pub target_label: String,
    pub save_raw: bool,
    /// Replacement for [`RAW_SOURCE_TOKEN`] in raw answer paths.
    pub raw_output_dir: String,
    /// Answers containing any of these are skipped.
    pub skip_markers: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_TRANSCRIPTS_FILE),
            metadata: PathBuf::from(DEFAULT_SELECTED_FILE),
            output_dir: PathBuf::from("."),
            source_label: GITHUB_DATASET.to_string(),
            target_label: "gpt4".to_string(),
            save_raw: false,
            raw_output_dir: DEFAULT_RAW_OUTPUT_DIR.to_string(),
            skip_markers: DEFAULT_SKIP_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExtractConfig {
    /// The token that raw answer paths substitute away.
    pub fn raw_source_token(&self) -> &str {
        RAW_SOURCE_TOKEN
    }
}

/// Settings for one classification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyConfig {
    /// Dataset label, e.g. `github` or `gpt4`.
    pub dataset: String,
    /// Corpus directory. Defaults to `<dataset>_code`.
    pub code_dir: Option<PathBuf>,
    /// Provenance metadata. Defaults to `codeinfo.json` for the `github` dataset only.
    pub metadata: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Stop once more than this many records have been gathered.
    pub max_files: usize,
    pub pretty: bool,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            dataset: GITHUB_DATASET.to_string(),
            code_dir: None,
            metadata: None,
            output_dir: PathBuf::from("."),
            max_files: DEFAULT_MAX_FILES,
            pretty: false,
        }
    }
}

impl ClassifyConfig {
    pub fn code_dir(&self) -> PathBuf {
        self.code_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}_code", self.dataset)))
    }

    pub fn metadata_path(&self) -> Option<PathBuf> {
        match &self.metadata {
            Some(path) => Some(path.clone()),
            None if self.dataset == GITHUB_DATASET => Some(PathBuf::from(DEFAULT_CODEINFO_FILE)),
            None => None,
        }
    }

    /// Where the consolidated `file_info_<dataset>.json` document is written.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("file_info_{}.json", self.dataset))
    }
}
