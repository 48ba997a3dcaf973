//! # Classification Batch Driver
//!
//! Walks a corpus directory and classifies each source file in turn. Files are
//! processed strictly one after another; the resulting [`FileInfoMap`] is
//! handed back to the caller, which writes it out once at the end of the run.

use super::FileClassifier;
use crate::{
    config::ClassifyConfig,
    constants::SOURCE_GLOB,
    errors::BatchError,
    types::FileInfoMap,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{info, instrument, warn};

/// A corpus file loaded for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Key of the file in the output mapping.
    pub filename: String,
    /// On-disk location, passed to the external tools.
    pub path: PathBuf,
    /// Lines with surrounding whitespace trimmed.
    pub lines: Vec<String>,
    /// Size in bytes.
    pub filesize: u64,
}

impl SourceFile {
    /// Reads `path` as UTF-8. Undecodable content is reported as [`BatchError::Decode`].
    pub fn read(path: &Path, filename: impl Into<String>) -> Result<Self, BatchError> {
        let bytes = fs::read(path)?;
        let filesize = bytes.len() as u64;
        let content =
            String::from_utf8(bytes).map_err(|_| BatchError::Decode(path.to_path_buf()))?;
        Ok(Self {
            filename: filename.into(),
            path: path.to_path_buf(),
            lines: split_lines(&content)
                .into_iter()
                .map(|line| line.trim().to_string())
                .collect(),
            filesize,
        })
    }
}

/// Splits on `\n`, `\r\n` and lone `\r` line endings. A trailing line ending
/// does not start another line.
fn split_lines(content: &str) -> Vec<&str> {
    if content.is_empty() {
        return Vec::new();
    }
    let content = content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix(['\n', '\r']))
        .unwrap_or(content);
    content
        .split("\r\n")
        .flat_map(|chunk| chunk.split(['\n', '\r']))
        .collect()
}

/// `path` with `.` components removed, so `./code` and `code` compare equal.
fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

/// The output key for a corpus file: the first path component below `code_dir`.
pub fn record_key(code_dir: &Path, path: &Path) -> String {
    without_cur_dir(path)
        .strip_prefix(without_cur_dir(code_dir))
        .ok()
        .and_then(|relative| {
            relative.components().find_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
        })
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Lists the source files below `code_dir` in sorted order.
pub fn discover_sources(code_dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&code_dir.to_string_lossy()),
        SOURCE_GLOB
    );
    let mut sources = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => sources.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable path during discovery: {e}"),
        }
    }
    sources.sort();
    Ok(sources)
}

/// Loads per-file provenance metadata. No path means no metadata.
pub fn load_corpus_metadata(path: Option<&Path>) -> Result<BTreeMap<String, Value>, BatchError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(BTreeMap::new()),
    }
}

/// Classifies every source file of the configured corpus into `file_info`.
///
/// Unreadable or undecodable files and files the classifier rejects get a null
/// record; the run continues. The run stops early once `file_info` holds more
/// than `max_files` entries.
#[instrument(skip(classifier, config, file_info), fields(dataset = %config.dataset))]
pub async fn run_classification(
    classifier: &FileClassifier,
    config: &ClassifyConfig,
    mut file_info: FileInfoMap,
) -> Result<FileInfoMap, BatchError> {
    let code_dir = config.code_dir();
    if !code_dir.is_dir() {
        return Err(BatchError::MissingCodeDir(code_dir));
    }

    let metadata = load_corpus_metadata(config.metadata_path().as_deref())?;
    let sources = discover_sources(&code_dir)?;
    info!(
        "Discovered {} source files under '{}' ({} metadata entries).",
        sources.len(),
        code_dir.display(),
        metadata.len()
    );

    for path in sources {
        let filename = record_key(&code_dir, &path);

        let record = match SourceFile::read(&path, filename.clone()) {
            Ok(source) => {
                let github = metadata.get(&filename).cloned();
                let record = classifier.classify_file(&source, github).await;
                match &record {
                    Some(record) => println!("{filename} {}", serde_json::to_string(record)?),
                    None => println!("error parsing {filename}"),
                }
                record
            }
            Err(e) => {
                println!("error reading {}", path.display());
                warn!("Failed to read '{}': {e}", path.display());
                None
            }
        };
        if file_info.insert(filename.clone(), record).is_some() {
            warn!("Record for '{filename}' replaced by '{}'.", path.display());
        }

        if file_info.len() > config.max_files {
            info!("Reached the limit of {} files. Stopping.", config.max_files);
            break;
        }
    }

    info!(
        "Classification finished: {} records, {} null.",
        file_info.len(),
        file_info.null_count()
    );
    Ok(file_info)
}
