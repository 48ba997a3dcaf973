//! # Shared Constants
//!
//! Marker strings, defaults and file names shared by the extraction and
//! classification pipelines and the `codeprep` CLI.

/// The marker that opens and closes a fenced code block.
pub const FENCE_MARKER: &str = "```";

/// Label reported for text spans whose language could not be determined.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Label reported for English text spans.
pub const ENGLISH_LANGUAGE: &str = "ENGLISH";

/// Phrases that mark a file as machine-generated. Matched case-insensitively.
pub const AUTOGEN_MARKERS: &[&str] = &[
    "all changes made in this file will be lost",
    "auto-generated",
    "created by makepy.py",
];

/// Matches `if <n> - <n>:` conditionals used to disguise constant branches.
pub const OBFUSCATION_PATTERN: &str = r"if \b\d+\s*-\s*\d+\b:";

/// Answers containing one of these markers are framework boilerplate and are skipped.
pub const DEFAULT_SKIP_MARKERS: &[&str] = &["Generated by Django"];

/// The dataset label whose corpus ships with provenance metadata.
pub const GITHUB_DATASET: &str = "github";

/// Provenance metadata file used when classifying the `github` dataset.
pub const DEFAULT_CODEINFO_FILE: &str = "codeinfo.json";

/// Default transcript collection produced by the model-querying stage.
pub const DEFAULT_TRANSCRIPTS_FILE: &str = "data/gpt4/outputs_of_selected_for_recoding_prompt2.json";

/// Default metadata mapping transcript keys to source file paths.
pub const DEFAULT_SELECTED_FILE: &str = "data/github/selected.json";

/// Default directory name for raw model answers when `--save-raw` is on.
pub const DEFAULT_RAW_OUTPUT_DIR: &str = "github_code_recoded_gpt4_raw_output";

/// Path token replaced by the raw output directory when saving raw answers.
pub const RAW_SOURCE_TOKEN: &str = "github_code";

/// Glob used to discover source files below a corpus directory.
pub const SOURCE_GLOB: &str = "**/*.py";

/// Upper bound on the number of records gathered in one classification run.
pub const DEFAULT_MAX_FILES: usize = 1_000_000;

/// Default lint command; prints one finding per line.
pub const DEFAULT_LINT_COMMAND: &str = "flake8";

/// Default metrics command; invoked as `<cmd> <metric> -j <path>`.
pub const DEFAULT_METRICS_COMMAND: &str = "radon";

/// Default timeout for a single external tool invocation.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 60;
