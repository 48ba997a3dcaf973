use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning transcripts into extracted source files.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The substitution rule did not change the path, so writing would clobber the source file.
    #[error("Substituting '{from}' with '{to}' left path '{path}' unchanged")]
    PathUnchanged {
        path: String,
        from: String,
        to: String,
    },
}

/// Errors raised by the in-process sub-computations of the file classifier.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Cannot compute line statistics for an empty file")]
    EmptyInput,
    #[error("Language identification failed: {0}")]
    LanguageIdentification(String),
    #[error("Source language guess failed: {0}")]
    LanguageGuess(String),
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Errors raised when invoking an external lint or metrics tool.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{command}' timed out after {secs}s")]
    Timeout { command: String, secs: u64 },
    #[error("'{command}' produced malformed JSON: {source}")]
    MalformedOutput {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{command}' output has no entry for '{path}'")]
    MissingEntry { command: String, path: String },
    #[error("Unknown metric '{0}', expected one of cc, hal, raw, mi")]
    UnknownMetric(String),
}

/// Errors from a classification run.
///
/// Setup failures abort the run. Read and decode failures of a single file are
/// turned into null records by the driver instead.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Code directory '{}' does not exist", .0.display())]
    MissingCodeDir(PathBuf),
    #[error("'{}' is not valid UTF-8", .0.display())]
    Decode(PathBuf),
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to (de)serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Classifier setup failed: {0}")]
    Classifier(#[from] ClassifyError),
}
