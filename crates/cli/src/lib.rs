//! # `codeprep` CLI Library Crate
//!
//! Argument parsing and command dispatch for the `codeprep` binary. Each
//! subcommand maps its flags onto a library config and runs one pipeline pass.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use codeprep::{
    constants::{
        DEFAULT_LINT_COMMAND, DEFAULT_MAX_FILES, DEFAULT_METRICS_COMMAND, DEFAULT_RAW_OUTPUT_DIR,
        DEFAULT_SELECTED_FILE, DEFAULT_SKIP_MARKERS, DEFAULT_TOOL_TIMEOUT_SECS,
        DEFAULT_TRANSCRIPTS_FILE, GITHUB_DATASET,
    },
    run_classification, run_extraction, ClassifyConfig, ExtractConfig, FileClassifier,
    FileInfoMap, Metric, ToolConfig,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the code block from each model answer into a source file
    Extract(ExtractArgs),
    /// Compute heuristics and tool metrics for every file of a corpus
    Classify(ClassifyArgs),
}

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// JSON file with the model transcripts.
    #[arg(long, default_value = DEFAULT_TRANSCRIPTS_FILE)]
    pub input: PathBuf,
    /// JSON file mapping each transcript key to its source file metadata.
    #[arg(long, default_value = DEFAULT_SELECTED_FILE)]
    pub metadata: PathBuf,
    /// Base directory for the extracted files.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
    /// Path token naming the source corpus.
    #[arg(long, default_value = GITHUB_DATASET)]
    pub source_label: String,
    /// Replacement for the source token in output paths.
    #[arg(long, default_value = "gpt4")]
    pub target_label: String,
    /// Also save each raw answer.
    #[arg(long)]
    pub save_raw: bool,
    /// Directory token for raw answers.
    #[arg(long, default_value = DEFAULT_RAW_OUTPUT_DIR)]
    pub raw_output_dir: String,
    /// Skip answers containing this text. Repeatable; replaces the defaults.
    #[arg(long = "skip-marker")]
    pub skip_markers: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// Dataset label. The corpus is read from `<dataset>_code`.
    #[arg(short, long, default_value = GITHUB_DATASET)]
    pub dataset: String,
    /// Overrides the corpus directory.
    #[arg(long)]
    pub code_dir: Option<PathBuf>,
    /// Provenance metadata. Defaults to `codeinfo.json` for the github dataset.
    #[arg(long)]
    pub metadata: Option<PathBuf>,
    /// Directory for `file_info_<dataset>.json`.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
    /// Stop once more than this many files have been recorded.
    #[arg(long, default_value_t = DEFAULT_MAX_FILES)]
    pub max_files: usize,
    /// Pretty-print the output document.
    #[arg(long)]
    pub pretty: bool,
    /// Metrics to request from the metrics tool, comma-separated.
    #[arg(long, value_delimiter = ',', default_value = "cc,hal,raw,mi")]
    pub metrics: Vec<Metric>,
    /// Marker phrase flagging a file as auto-generated. Repeatable; replaces the defaults.
    #[arg(long = "autogen-marker")]
    pub autogen_markers: Vec<String>,
    #[command(flatten)]
    pub tools: ToolArgs,
}

#[derive(Args, Debug)]
pub struct ToolArgs {
    /// Linter executable. One finding per output line.
    #[arg(long, env = "CODEPREP_LINT_COMMAND", default_value = DEFAULT_LINT_COMMAND)]
    pub lint_command: String,
    /// Metrics executable, called as `<command> <metric> -j <path>`.
    #[arg(long, env = "CODEPREP_METRICS_COMMAND", default_value = DEFAULT_METRICS_COMMAND)]
    pub metrics_command: String,
    /// Timeout for a single tool invocation, in seconds.
    #[arg(long, env = "CODEPREP_TOOL_TIMEOUT_SECS", default_value_t = DEFAULT_TOOL_TIMEOUT_SECS)]
    pub tool_timeout_secs: u64,
}

impl From<ExtractArgs> for ExtractConfig {
    fn from(args: ExtractArgs) -> Self {
        let skip_markers = if args.skip_markers.is_empty() {
            DEFAULT_SKIP_MARKERS.iter().map(|s| s.to_string()).collect()
        } else {
            args.skip_markers
        };
        Self {
            input: args.input,
            metadata: args.metadata,
            output_dir: args.output_dir,
            source_label: args.source_label,
            target_label: args.target_label,
            save_raw: args.save_raw,
            raw_output_dir: args.raw_output_dir,
            skip_markers,
        }
    }
}

impl From<ToolArgs> for ToolConfig {
    fn from(args: ToolArgs) -> Self {
        Self {
            lint_command: args.lint_command,
            metrics_command: args.metrics_command,
            timeout: Duration::from_secs(args.tool_timeout_secs),
        }
    }
}

// --- Public Entrypoint ---

/// The main entry point for the `codeprep` CLI library.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract(args) => handle_extract(args),
        Commands::Classify(args) => handle_classify(args).await,
    }
}

// --- Command Handlers ---

fn handle_extract(args: ExtractArgs) -> Result<()> {
    info!("Starting 'extract' command with args: {:?}", args);
    let config = ExtractConfig::from(args);
    let report = run_extraction(&config).with_context(|| {
        format!(
            "Extraction from '{}' failed",
            config.input.display()
        )
    })?;
    println!(
        "Extracted {} files ({} raw answers saved, {} skipped, {} without metadata).",
        report.written.len(),
        report.raw_written.len(),
        report.skipped.len(),
        report.missing_metadata.len()
    );
    Ok(())
}

async fn handle_classify(args: ClassifyArgs) -> Result<()> {
    info!("Starting 'classify' command with args: {:?}", args);
    let mut builder = FileClassifier::builder()
        .tool_config(args.tools.into())
        .metrics(args.metrics);
    if !args.autogen_markers.is_empty() {
        builder = builder.autogen_markers(args.autogen_markers);
    }
    let classifier = builder
        .build()
        .context("Failed to set up the file classifier")?;
    let config = ClassifyConfig {
        dataset: args.dataset,
        code_dir: args.code_dir,
        metadata: args.metadata,
        output_dir: args.output_dir,
        max_files: args.max_files,
        pretty: args.pretty,
    };

    let file_info = run_classification(&classifier, &config, FileInfoMap::new())
        .await
        .with_context(|| format!("Classification of dataset '{}' failed", config.dataset))?;

    let output_path = config.output_path();
    file_info
        .write_json(&output_path, config.pretty)
        .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
    println!(
        "Wrote {} records ({} null) to '{}'.",
        file_info.len(),
        file_info.null_count(),
        output_path.display()
    );
    Ok(())
}
