//! # Classifier Tests
//!
//! Exercises record composition with mock detectors and tools, so no models or
//! external binaries are needed.

use anyhow::Result;
use codeprep::classify::SourceFile;
use codeprep::{ClassifyError, FileClassifier, Metric};
use codeprep_test_utils::{
    lines, mock_classifier, FailingLanguageIdentifier, FixedGuesser, MockLanguageIdentifier,
    MockMetricsTool, WordCounter,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

fn source(filename: &str, code: &[&str]) -> SourceFile {
    SourceFile {
        filename: filename.to_string(),
        path: PathBuf::from(format!("gpt4_code/{filename}")),
        lines: lines(code),
        filesize: 123,
    }
}

#[test]
fn test_classify_computes_in_process_fields() -> Result<()> {
    // Arrange
    let classifier = mock_classifier(MockMetricsTool::new())?;
    let code = lines(&["# auto-generated", "if 5 - 5:", "    x = 1"]);

    // Act
    let fields = classifier.classify(&code)?;

    // Assert
    assert_eq!(fields.guess, "Python");
    assert_eq!(fields.nonenglish, (false, vec![]));
    assert_eq!(fields.obfuscations, 1);
    assert!(fields.autogen);
    assert_eq!(fields.ntokens, 9);
    assert_eq!(fields.mean_max_line_length.1, 16.0);
    Ok(())
}

#[test]
fn test_classify_rejects_empty_file() -> Result<()> {
    let classifier = mock_classifier(MockMetricsTool::new())?;
    assert!(matches!(
        classifier.classify(&[]),
        Err(ClassifyError::EmptyInput)
    ));
    Ok(())
}

#[test]
fn test_nonenglish_labels_are_reported() -> Result<()> {
    // Arrange
    let classifier = FileClassifier::builder()
        .language_identifier(Arc::new(MockLanguageIdentifier::new(&[
            "ENGLISH", "Unknown", "CHINESE",
        ])))
        .source_guesser(Arc::new(FixedGuesser("Python".to_string())))
        .token_counter(Arc::new(WordCounter))
        .tools(Arc::new(MockMetricsTool::new()))
        .build()?;

    // Act
    let fields = classifier.classify(&lines(&["# 你好", "x = 1"]))?;

    // Assert
    assert_eq!(fields.nonenglish, (true, vec!["CHINESE".to_string()]));
    Ok(())
}

#[tokio::test]
async fn test_classify_file_merges_tool_results() -> Result<()> {
    // Arrange
    let tools = MockMetricsTool::new();
    tools.set_lint_findings(4);
    tools.add_metric(Metric::Cc, json!([{"name": "f", "complexity": 1}]));
    tools.add_metric(Metric::Hal, json!({"total": {"volume": 12.0}}));
    tools.add_metric(Metric::Raw, json!({"loc": 2, "sloc": 2}));
    tools.add_metric(Metric::Mi, json!({"mi": 100.0, "rank": "A"}));
    let classifier = mock_classifier(tools.clone())?;
    let github = json!({"repo": "octo/hello", "stars": 3});

    // Act
    let record = classifier
        .classify_file(&source("a.py", &["def f():", "return 1"]), Some(github.clone()))
        .await
        .expect("record should not be null");

    // Assert
    assert_eq!(record.filename, "a.py");
    assert_eq!(record.filesize, 123);
    assert_eq!(record.github, Some(github));
    assert_eq!(record.flake8, Some(4));
    assert_eq!(record.cc, Some(json!([{"name": "f", "complexity": 1}])));
    assert_eq!(record.mi, Some(json!({"mi": 100.0, "rank": "A"})));
    assert_eq!(
        tools.get_calls(),
        vec![
            "lint gpt4_code/a.py",
            "cc gpt4_code/a.py",
            "hal gpt4_code/a.py",
            "raw gpt4_code/a.py",
            "mi gpt4_code/a.py",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_unavailable_tools_only_null_their_fields() -> Result<()> {
    // Arrange
    let classifier = mock_classifier(MockMetricsTool::unavailable())?;

    // Act
    let record = classifier
        .classify_file(&source("b.py", &["print('hi')"]), None)
        .await
        .expect("record should not be null");

    // Assert
    assert_eq!(record.flake8, None);
    assert_eq!(record.cc, None);
    assert_eq!(record.hal, None);
    assert_eq!(record.raw, None);
    assert_eq!(record.mi, None);
    assert_eq!(record.github, None);
    assert_eq!(record.guess, "Python");
    assert_eq!(record.mean_max_line_length, (11.0, 11.0));
    assert_eq!(record.ntokens, 1);
    Ok(())
}

#[tokio::test]
async fn test_one_failing_metric_does_not_block_the_others() -> Result<()> {
    // Arrange
    let tools = MockMetricsTool::new();
    tools.add_metric(Metric::Raw, json!({"loc": 1}));
    let classifier = mock_classifier(tools)?;

    // Act
    let record = classifier
        .classify_file(&source("c.py", &["x = 1"]), None)
        .await
        .expect("record should not be null");

    // Assert
    assert_eq!(record.raw, Some(json!({"loc": 1})));
    assert_eq!(record.cc, None);
    assert_eq!(record.flake8, None);
    Ok(())
}

#[tokio::test]
async fn test_empty_file_gives_null_record_without_calling_tools() -> Result<()> {
    // Arrange
    let tools = MockMetricsTool::new();
    let classifier = mock_classifier(tools.clone())?;

    // Act
    let record = classifier.classify_file(&source("empty.py", &[]), None).await;

    // Assert
    assert!(record.is_none());
    assert!(tools.get_calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_detector_failure_gives_null_record() -> Result<()> {
    // Arrange
    let classifier = FileClassifier::builder()
        .language_identifier(Arc::new(FailingLanguageIdentifier))
        .source_guesser(Arc::new(FixedGuesser("Python".to_string())))
        .token_counter(Arc::new(WordCounter))
        .tools(Arc::new(MockMetricsTool::new()))
        .build()?;

    // Act
    let record = classifier.classify_file(&source("d.py", &["x = 1"]), None).await;

    // Assert
    assert!(record.is_none());
    Ok(())
}

#[tokio::test]
async fn test_only_selected_metrics_are_requested() -> Result<()> {
    // Arrange
    let tools = MockMetricsTool::new();
    tools.add_metric(Metric::Cc, json!([]));
    tools.add_metric(Metric::Mi, json!({"mi": 90.0}));
    let classifier = FileClassifier::builder()
        .language_identifier(Arc::new(MockLanguageIdentifier::new(&["ENGLISH"])))
        .source_guesser(Arc::new(FixedGuesser("Python".to_string())))
        .token_counter(Arc::new(WordCounter))
        .tools(Arc::new(tools.clone()))
        .metrics(vec![Metric::Mi, Metric::Mi])
        .build()?;

    // Act
    let record = classifier
        .classify_file(&source("f.py", &["x = 1"]), None)
        .await
        .expect("record should not be null");

    // Assert
    assert_eq!(record.mi, Some(json!({"mi": 90.0})));
    assert_eq!(record.cc, None, "cc was not requested");
    assert_eq!(
        tools.get_calls(),
        vec!["lint gpt4_code/f.py", "mi gpt4_code/f.py"]
    );
    Ok(())
}

#[test]
fn test_custom_autogen_markers_replace_the_defaults() -> Result<()> {
    // Arrange
    let classifier = FileClassifier::builder()
        .language_identifier(Arc::new(MockLanguageIdentifier::new(&["ENGLISH"])))
        .source_guesser(Arc::new(FixedGuesser("Python".to_string())))
        .token_counter(Arc::new(WordCounter))
        .tools(Arc::new(MockMetricsTool::new()))
        .autogen_markers(vec!["Code generated by".to_string()])
        .build()?;

    // Act
    let custom = classifier.classify(&lines(&["# code generated by protoc", "x = 1"]))?;
    let default = classifier.classify(&lines(&["# auto-generated", "x = 1"]))?;

    // Assert
    assert!(custom.autogen);
    assert!(!default.autogen);
    Ok(())
}

#[test]
fn test_record_serializes_as_plain_json() -> Result<()> {
    // Arrange
    let record = codeprep::ClassificationRecord {
        filename: "e.py".to_string(),
        guess: "Python".to_string(),
        nonenglish: (true, vec!["FRENCH".to_string()]),
        mean_max_line_length: (2.5, 4.0),
        obfuscations: 0,
        autogen: false,
        filesize: 10,
        github: None,
        ntokens: 3,
        flake8: None,
        cc: None,
        hal: None,
        raw: None,
        mi: None,
    };

    // Act
    let value = serde_json::to_value(&record)?;

    // Assert
    assert_eq!(value["nonenglish"], json!([true, ["FRENCH"]]));
    assert_eq!(value["mean_max_line_length"], json!([2.5, 4.0]));
    assert_eq!(value["flake8"], json!(null));
    assert_eq!(value["filesize"], json!(10));
    Ok(())
}
