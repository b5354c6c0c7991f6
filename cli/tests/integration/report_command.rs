//! Integration tests for `site-doctor report`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::support::{Workspace, files_starting_with};

#[test]
fn test_report_on_empty_log_still_writes_a_report() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deploy log is empty"))
        .stdout(predicate::str::contains("Report written"));

    let reports = files_starting_with(&ws.out_dir(), "deployment_report_");
    assert_eq!(reports.len(), 1);
    let content = std::fs::read_to_string(&reports[0]).expect("read report");
    assert!(content.starts_with("# Shop Deployment Report"));
    assert!(content.contains("_No entries recorded._"));
}

#[test]
fn test_report_renders_existing_log_entries() {
    let ws = Workspace::new();
    std::fs::create_dir_all(ws.out_dir()).expect("out dir");
    std::fs::write(
        ws.out_dir().join("deployment_log.json"),
        r#"[{"phase":"verify","status":"success","details":"4/4 endpoints passed","timestamp":"2026-10-16T09:30:00Z"}]"#,
    )
    .expect("write log");

    let output = ws
        .cmd()
        .args(["report", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let path = value["path"].as_str().expect("path");

    let content = std::fs::read_to_string(path).expect("read report");
    assert!(content.contains("| verify |"));
    assert!(content.contains("4/4 endpoints passed"));
}
