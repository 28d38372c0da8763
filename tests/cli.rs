use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_junit-history"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

const FOO_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="Foo" tests="3" failures="1" errors="0" skipped="0" time="1.5" timestamp="2024-01-01T10:00:00">
  <testcase name="one" classname="pkg.Foo" time="0.5"><failure type="AssertionError">boom</failure></testcase>
  <testcase name="two" classname="pkg.Foo" time="0.5"/>
  <testcase name="three" classname="pkg.Foo" time="0.5"/>
</testsuite>"#;

#[test]
fn test_report_is_written_to_history() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results");
    std::fs::create_dir_all(&results).unwrap();
    std::fs::write(results.join("TEST-Foo.xml"), FOO_REPORT).unwrap();
    let output = dir.path().join("history.json");

    let out = run(&[results.as_path(), Path::new("unit"), output.as_path()]);
    assert!(out.status.success());

    let json = read_json(&output);
    let suites = json["suites"].as_array().unwrap();
    assert_eq!(suites.len(), 1);
    assert_eq!(suites[0]["status"], "failed");
    assert_eq!(suites[0]["passed"], 2);
    assert_eq!(suites[0]["type"], "unit");

    let statuses: Vec<_> = json["cases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["status"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(statuses, vec!["failed", "passed", "passed"]);
    assert_eq!(json["cases"][0]["failure_message"], "boom");

    // A second run appends
    let out = run(&[results.as_path(), Path::new("unit"), output.as_path()]);
    assert!(out.status.success());
    assert_eq!(read_json(&output)["suites"].as_array().unwrap().len(), 2);
}

#[test]
fn test_missing_directory_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("history.json");

    let out = run(&[dir.path().join("absent").as_path(), Path::new("unit"), output.as_path()]);
    assert!(out.status.success());

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("does not exist"));

    let json = read_json(&output);
    assert!(json["suites"].as_array().unwrap().is_empty());
    assert!(json["cases"].as_array().unwrap().is_empty());
}

#[test]
fn test_corrupt_history_is_replaced() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("TEST-Foo.xml"), FOO_REPORT).unwrap();
    let output = dir.path().join("history.json");
    std::fs::write(&output, "not json").unwrap();

    let out = run(&[dir.path(), Path::new("unit"), output.as_path()]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Proceeding with empty data."));

    let json = read_json(&output);
    assert_eq!(json["suites"].as_array().unwrap().len(), 1);
    assert_eq!(json["cases"].as_array().unwrap().len(), 3);
}

#[test]
fn test_wrong_argument_count_prints_usage() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("history.json");

    let out = run(&[dir.path(), output.as_path()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
    assert!(!output.exists());

    let out = run(&[dir.path(), Path::new("unit"), output.as_path(), Path::new("extra")]);
    assert!(!out.status.success());
    assert!(!output.exists());
}
