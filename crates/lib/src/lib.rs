//! # codeprep
//!
//! Data preparation for a code-dataset study. The crate has two passes:
//!
//! 1.  **Extraction** ([`extract`]): pull the first fenced code block out of each
//!     model answer and write it as a source file mirroring the original corpus.
//! 2.  **Classification** ([`classify`]): compute per-file heuristics (line
//!     lengths, language guess, non-English content, auto-generation markers,
//!     obfuscation patterns, token count) plus lint and complexity metrics from
//!     external tools, gathered into one JSON document keyed by filename.

pub mod classify;
pub mod config;
pub mod constants;
pub mod errors;
pub mod extract;
pub mod tools;
pub mod types;

pub use classify::{run_classification, FileClassifier, FileClassifierBuilder, SourceFile};
pub use config::{ClassifyConfig, ExtractConfig, ToolConfig};
pub use errors::{BatchError, ClassifyError, ExtractError, ToolError};
pub use extract::{extract_items, run_extraction, BlockExtractor, ExtractionReport};
pub use tools::{CodeMetricsTool, Metric, SubprocessTools};
pub use types::{
    ClassificationFields, ClassificationRecord, ExtractedFile, FileInfoMap, SourceMetadata,
    TranscriptItem,
};
