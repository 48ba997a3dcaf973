//! # External Tool Collaborators
//!
//! The lint and complexity metrics are produced by third-party command-line
//! tools. This module hides process spawning behind [`CodeMetricsTool`] so the
//! classifier only deals in paths, metric names and parsed results.

use crate::config::ToolConfig;
use crate::errors::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;
use tokio::process::Command;
use tracing::debug;

/// The complexity metrics requested from the metrics tool.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cyclomatic complexity.
    Cc,
    /// Halstead metrics.
    Hal,
    /// Raw size metrics (LOC, SLOC, comments, ...).
    Raw,
    /// Maintainability index.
    Mi,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Cc, Metric::Hal, Metric::Raw, Metric::Mi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cc => "cc",
            Metric::Hal => "hal",
            Metric::Raw => "raw",
            Metric::Mi => "mi",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cc" => Ok(Metric::Cc),
            "hal" => Ok(Metric::Hal),
            "raw" => Ok(Metric::Raw),
            "mi" => Ok(Metric::Mi),
            other => Err(ToolError::UnknownMetric(other.to_string())),
        }
    }
}

/// Lint and complexity metrics for a file on disk.
#[async_trait]
pub trait CodeMetricsTool: Send + Sync {
    /// Number of lint findings reported for the file.
    async fn lint_findings(&self, path: &Path) -> Result<usize, ToolError>;

    /// The metric result for the file, as an opaque JSON value.
    async fn metric(&self, path: &Path, metric: Metric) -> Result<Value, ToolError>;
}

/// Counts the non-empty lines of lint output.
pub fn count_findings(stdout: &str) -> usize {
    stdout.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Picks the entry for `path` out of a metrics tool's JSON report.
pub fn parse_metric_report(command: &str, stdout: &str, path: &str) -> Result<Value, ToolError> {
    let mut report: Value =
        serde_json::from_str(stdout).map_err(|source| ToolError::MalformedOutput {
            command: command.to_string(),
            source,
        })?;
    report
        .get_mut(path)
        .map(Value::take)
        .ok_or_else(|| ToolError::MissingEntry {
            command: command.to_string(),
            path: path.to_string(),
        })
}

/// Runs the configured tools as child processes.
///
/// A non-zero exit status is not a failure by itself: linters exit non-zero
/// when they report findings. Only launch failures, timeouts and unparseable
/// output are errors.
#[derive(Debug, Clone, Default)]
pub struct SubprocessTools {
    config: ToolConfig,
}

impl SubprocessTools {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    async fn run(&self, program: &str, args: &[&str]) -> Result<String, ToolError> {
        let command_line = format!("{program} {}", args.join(" "));
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.config.timeout, command.output())
            .await
            .map_err(|_| ToolError::Timeout {
                command: command_line.clone(),
                secs: self.config.timeout.as_secs(),
            })?
            .map_err(|source| ToolError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        if !output.status.success() {
            debug!(
                "'{}' exited with {}: {}",
                command_line,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl CodeMetricsTool for SubprocessTools {
    async fn lint_findings(&self, path: &Path) -> Result<usize, ToolError> {
        let path = path.to_string_lossy().into_owned();
        let stdout = self.run(&self.config.lint_command, &[path.as_str()]).await?;
        Ok(count_findings(&stdout))
    }

    async fn metric(&self, path: &Path, metric: Metric) -> Result<Value, ToolError> {
        let path = path.to_string_lossy().into_owned();
        let stdout = self
            .run(&self.config.metrics_command, &[metric.as_str(), "-j", path.as_str()])
            .await?;
        parse_metric_report(&self.config.metrics_command, &stdout, &path)
    }
}
