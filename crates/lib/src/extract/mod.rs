//! # Transcript Extraction
//!
//! The first pass of the pipeline: load model answers, recover the code block
//! from each one and materialize it as a source file next to the corpus it was
//! generated from.

pub mod block;
pub mod paths;

pub use block::BlockExtractor;
pub use paths::PathSubstitution;

use crate::{
    config::ExtractConfig,
    errors::ExtractError,
    types::{ExtractedFile, SourceMetadata, TranscriptCollection, TranscriptItem},
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Summary of an extraction run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtractionReport {
    /// Extracted source files, in processing order.
    pub written: Vec<PathBuf>,
    /// Raw answers saved for debugging.
    pub raw_written: Vec<PathBuf>,
    /// Keys skipped because the answer contained a boilerplate marker.
    pub skipped: Vec<String>,
    /// Keys with no entry in the metadata file.
    pub missing_metadata: Vec<String>,
}

/// Loads a transcript collection from a JSON file.
pub fn load_transcripts(path: &Path) -> Result<Vec<TranscriptItem>, ExtractError> {
    let content = fs::read_to_string(path)?;
    let collection: TranscriptCollection = serde_json::from_str(&content)?;
    Ok(collection.into_items())
}

/// Loads the key to source-metadata mapping from a JSON file.
pub fn load_source_metadata(
    path: &Path,
) -> Result<BTreeMap<String, SourceMetadata>, ExtractError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Runs a full extraction: load inputs from disk, then extract and write every item.
#[instrument(skip(config), fields(input = %config.input.display()))]
pub fn run_extraction(config: &ExtractConfig) -> Result<ExtractionReport, ExtractError> {
    let items = load_transcripts(&config.input)?;
    println!("Loaded {} recoded files", items.len());
    let metadata = load_source_metadata(&config.metadata)?;
    fs::create_dir_all(&config.output_dir)?;

    let report = extract_items(items, &metadata, config)?;
    info!(
        "Extraction finished: {} written, {} skipped, {} without metadata.",
        report.written.len(),
        report.skipped.len(),
        report.missing_metadata.len()
    );
    Ok(report)
}

/// Extracts and writes each item in order.
///
/// Boilerplate answers and keys without metadata are skipped with a diagnostic.
/// A path substitution that does not change the path aborts the run, since it
/// means the labels do not match the metadata.
pub fn extract_items(
    items: Vec<TranscriptItem>,
    metadata: &BTreeMap<String, SourceMetadata>,
    config: &ExtractConfig,
) -> Result<ExtractionReport, ExtractError> {
    let code_rule = PathSubstitution::new(&config.source_label, &config.target_label);
    let raw_rule = PathSubstitution::new(config.raw_source_token(), &config.raw_output_dir);
    let mut report = ExtractionReport::default();

    for item in items {
        println!("{}", item.key);

        if let Some(marker) = config
            .skip_markers
            .iter()
            .find(|marker| item.answer.contains(marker.as_str()))
        {
            println!("Skipping {}: answer contains '{marker}'", item.key);
            report.skipped.push(item.key);
            continue;
        }

        let Some(source) = metadata.get(&item.key) else {
            warn!("No metadata for key '{}'. Skipping.", item.key);
            report.missing_metadata.push(item.key);
            continue;
        };

        if config.save_raw {
            let raw_path = raw_rule.apply(&source.filename, &config.output_dir)?;
            write_text(&raw_path, &item.answer)?;
            report.raw_written.push(raw_path);
        }

        let extracted = ExtractedFile {
            lines: BlockExtractor::extract(&item.answer, &item.key),
            key: item.key,
        };
        if extracted.lines.is_empty() {
            warn!("No code block found for key '{}'.", extracted.key);
        }

        let code_path = code_rule.apply(&source.filename, &config.output_dir)?;
        write_text(&code_path, &extracted.to_text())?;
        report.written.push(code_path);
    }

    Ok(report)
}

fn write_text(path: &Path, content: &str) -> Result<(), ExtractError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
