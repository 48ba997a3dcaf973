//! # External Tool Tests
//!
//! Output parsing is tested directly. Process handling uses standard Unix
//! utilities standing in for the real linter and metrics tool.

use anyhow::Result;
use codeprep::tools::{count_findings, parse_metric_report};
use codeprep::{CodeMetricsTool, Metric, SubprocessTools, ToolConfig, ToolError};
use serde_json::json;
use std::path::Path;
use std::time::Duration;

fn tools(lint_command: &str, metrics_command: &str, timeout: Duration) -> SubprocessTools {
    SubprocessTools::new(ToolConfig {
        lint_command: lint_command.to_string(),
        metrics_command: metrics_command.to_string(),
        timeout,
    })
}

#[test]
fn test_count_findings_ignores_blank_lines() {
    let stdout = "a.py:1:1: F401 'os' imported but unused\n\na.py:3:80: E501 line too long\n";
    assert_eq!(count_findings(stdout), 2);
}

#[test]
fn test_count_findings_of_clean_file_is_zero() {
    assert_eq!(count_findings(""), 0);
    assert_eq!(count_findings("\n"), 0);
}

#[test]
fn test_parse_metric_report_returns_entry_for_path() -> Result<()> {
    // Arrange
    let stdout = r#"{"code/a.py": {"mi": 71.3, "rank": "A"}, "code/b.py": {"mi": 12.0}}"#;

    // Act
    let value = parse_metric_report("radon", stdout, "code/a.py")?;

    // Assert
    assert_eq!(value, json!({"mi": 71.3, "rank": "A"}));
    Ok(())
}

#[test]
fn test_parse_metric_report_rejects_malformed_output() {
    let result = parse_metric_report("radon", "Traceback (most recent call last):", "a.py");
    assert!(matches!(result, Err(ToolError::MalformedOutput { .. })));
}

#[test]
fn test_parse_metric_report_reports_missing_entry() {
    let result = parse_metric_report("radon", r#"{"other.py": {}}"#, "a.py");
    match result {
        Err(ToolError::MissingEntry { path, .. }) => assert_eq!(path, "a.py"),
        other => panic!("expected MissingEntry, got {other:?}"),
    }
}

#[test]
fn test_metric_names_round_trip_through_strings() -> Result<()> {
    for metric in Metric::ALL {
        assert_eq!(metric.to_string().parse::<Metric>()?, metric);
    }
    assert!(matches!(
        "loc".parse::<Metric>(),
        Err(ToolError::UnknownMetric(name)) if name == "loc"
    ));
    Ok(())
}

#[tokio::test]
async fn test_missing_binary_is_a_spawn_error() {
    let tools = tools(
        "codeprep-no-such-linter",
        "codeprep-no-such-metrics",
        Duration::from_secs(5),
    );

    let lint = tools.lint_findings(Path::new("a.py")).await;
    let metric = tools.metric(Path::new("a.py"), Metric::Cc).await;

    assert!(matches!(lint, Err(ToolError::Spawn { .. })));
    assert!(matches!(metric, Err(ToolError::Spawn { .. })));
}

#[tokio::test]
async fn test_lint_output_lines_are_counted() -> Result<()> {
    // `echo` prints its argument once: one finding.
    let tools = tools("echo", "echo", Duration::from_secs(5));

    let findings = tools.lint_findings(Path::new("a.py")).await?;

    assert_eq!(findings, 1);
    Ok(())
}

#[tokio::test]
async fn test_non_json_metrics_output_is_malformed() {
    let tools = tools("echo", "echo", Duration::from_secs(5));

    let result = tools.metric(Path::new("a.py"), Metric::Raw).await;

    assert!(matches!(result, Err(ToolError::MalformedOutput { .. })));
}

#[tokio::test]
async fn test_slow_tool_times_out() {
    // `sleep 5` stands in for a hung linter.
    let tools = tools("sleep", "sleep", Duration::from_millis(100));

    let result = tools.lint_findings(Path::new("5")).await;

    assert!(matches!(result, Err(ToolError::Timeout { .. })));
}
