use crate::errors::BatchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A single model answer loaded from the querying stage.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranscriptItem {
    /// Unique identifier of the source file the answer was produced for.
    pub key: String,
    /// The raw, free-form answer text.
    pub answer: String,
}

/// A transcript collection as stored on disk.
///
/// The querying stage writes a JSON list of items; a JSON object keyed by item
/// key is accepted as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TranscriptCollection {
    List(Vec<TranscriptItem>),
    Keyed(BTreeMap<String, TranscriptItem>),
}

impl TranscriptCollection {
    /// Flattens the collection into items, preserving file order for lists.
    pub fn into_items(self) -> Vec<TranscriptItem> {
        match self {
            TranscriptCollection::List(items) => items,
            TranscriptCollection::Keyed(map) => map.into_values().collect(),
        }
    }
}

/// Provenance metadata for one selected source file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SourceMetadata {
    /// Path of the original corpus file, used as the template for output paths.
    pub filename: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Source code recovered from one transcript.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtractedFile {
    pub key: String,
    pub lines: Vec<String>,
}

impl ExtractedFile {
    /// The file contents as written to disk: lines joined with `\n`, no trailing newline.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// The in-process part of a classification, computed from lines alone.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClassificationFields {
    pub guess: String,
    pub nonenglish: (bool, Vec<String>),
    pub mean_max_line_length: (f64, f64),
    pub obfuscations: usize,
    pub autogen: bool,
    pub ntokens: usize,
}

/// The heuristic and metric summary for one source file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClassificationRecord {
    pub filename: String,
    /// Predicted programming language name.
    pub guess: String,
    /// Whether any natural-language span is neither English nor unknown, and the offending labels.
    pub nonenglish: (bool, Vec<String>),
    pub mean_max_line_length: (f64, f64),
    pub obfuscations: usize,
    pub autogen: bool,
    /// Size of the on-disk file in bytes.
    pub filesize: u64,
    /// Provenance metadata for the file, when the corpus provides it.
    pub github: Option<Value>,
    pub ntokens: usize,
    pub flake8: Option<usize>,
    pub cc: Option<Value>,
    pub hal: Option<Value>,
    pub raw: Option<Value>,
    pub mi: Option<Value>,
}

/// The classification output of a run: filename to record, or null when the
/// file could not be read or classified.
///
/// Serializes as a plain JSON object, so it can be passed between runs and
/// written out once at the end.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct FileInfoMap {
    records: BTreeMap<String, Option<ClassificationRecord>>,
}

impl FileInfoMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome for a file, replacing any earlier entry under the same name.
    ///
    /// Returns the replaced slot, if there was one.
    pub fn insert(
        &mut self,
        filename: String,
        record: Option<ClassificationRecord>,
    ) -> Option<Option<ClassificationRecord>> {
        self.records.insert(filename, record)
    }

    /// Returns the slot for `filename`: `None` if the file was never seen,
    /// `Some(None)` if it was seen but produced a null record.
    pub fn get(&self, filename: &str) -> Option<&Option<ClassificationRecord>> {
        self.records.get(filename)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of slots holding a null record.
    pub fn null_count(&self) -> usize {
        self.records.values().filter(|r| r.is_none()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<ClassificationRecord>)> {
        self.records.iter()
    }

    /// Serializes the whole mapping to `path` in one write.
    pub fn write_json(&self, path: &Path, pretty: bool) -> Result<(), BatchError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        fs::write(path, json)?;
        Ok(())
    }

    /// Loads a mapping previously written by [`FileInfoMap::write_json`].
    pub fn read_json(path: &Path) -> Result<Self, BatchError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
