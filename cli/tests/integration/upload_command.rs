//! Integration tests for `site-doctor upload`.
//!
//! The remote points at port 1 on localhost, so only the local packing and
//! the failure path are exercised.

#![allow(clippy::expect_used)]

use std::path::Path;

use predicates::prelude::*;

use crate::support::Workspace;

fn laravel_project(root: &Path) {
    for (path, contents) in [
        ("project/artisan", "#!/usr/bin/env php\n"),
        ("project/app/Models/User.php", "<?php\n"),
        ("project/public/index.php", "<?php\n"),
        ("project/node_modules/x/index.js", "x\n"),
    ] {
        let full = root.join(path);
        std::fs::create_dir_all(full.parent().expect("parent")).expect("mkdir");
        std::fs::write(full, contents).expect("write");
    }
}

#[test]
fn test_upload_dry_run_lists_the_selection() {
    let ws = Workspace::new();
    laravel_project(ws.dir.path());
    let output = ws
        .cmd()
        .args(["--json", "upload", "--dry-run", "--source", "project"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["procedure"], "upload");
    let names: Vec<&str> = value["steps"]
        .as_array()
        .expect("steps")
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(names, vec!["selection", "archive", "dry run"]);
    assert!(
        value["steps"][1]["detail"]
            .as_str()
            .expect("detail")
            .starts_with("3 files")
    );
}

#[test]
fn test_upload_to_unreachable_host_exits_one() {
    let ws = Workspace::new();
    laravel_project(ws.dir.path());
    ws.cmd()
        .args(["upload", "--source", "project"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn test_upload_missing_source_is_an_error() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["upload", "--dry-run", "--source", "absent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_upload_without_remote_json_error_code() {
    let ws = Workspace::without_remote();
    let output = ws
        .cmd()
        .args(["--json", "upload", "--dry-run"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["code"], "REMOTE_NOT_CONFIGURED");
}
