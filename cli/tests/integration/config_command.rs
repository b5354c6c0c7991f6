//! Integration tests for `site-doctor config`.
//!
//! All filesystem-touching tests pass a temp path through `--config` or
//! `SITE_DOCTOR_CONFIG`, so they never read or write the home directory.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;
use tempfile::TempDir;

use crate::support::site_doctor;

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("site-doctor.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

#[test]
fn test_config_help_shows_subcommands() {
    site_doctor()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_config_init_writes_template_once() {
    let (_dir, path) = temp_config_path();

    site_doctor()
        .args(["config", "init"])
        .env("SITE_DOCTOR_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration written"));

    let content = std::fs::read_to_string(&path).expect("template written");
    assert!(content.contains("project_root:"));
    assert!(!content.contains("password:"), "template must not carry secrets");

    site_doctor()
        .args(["config", "init"])
        .env("SITE_DOCTOR_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[cfg(unix)]
#[test]
fn test_config_init_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = temp_config_path();
    site_doctor()
        .args(["config", "init"])
        .env("SITE_DOCTOR_CONFIG", &path)
        .assert()
        .success();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_config_show_after_init() {
    let (_dir, path) = temp_config_path();
    site_doctor()
        .args(["config", "init"])
        .env("SITE_DOCTOR_CONFIG", &path)
        .assert()
        .success();

    site_doctor()
        .args(["config", "show"])
        .env("SITE_DOCTOR_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.com"))
        .stdout(predicate::str::contains("203.0.113.10"));
}

#[test]
fn test_config_show_json_is_parseable() {
    let (_dir, path) = temp_config_path();
    site_doctor()
        .args(["config", "init"])
        .env("SITE_DOCTOR_CONFIG", &path)
        .assert()
        .success();

    let output = site_doctor()
        .args(["config", "show", "--json"])
        .env("SITE_DOCTOR_CONFIG", &path)
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["config"]["site"]["url"], "https://example.com");
}

#[test]
fn test_config_show_without_file_fails() {
    let (_dir, path) = temp_config_path();
    site_doctor()
        .args(["config", "show"])
        .env("SITE_DOCTOR_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config init"));
}

#[test]
fn test_config_path_prints_explicit_path_in_quiet_mode() {
    let (_dir, path) = temp_config_path();
    site_doctor()
        .args(["config", "path", "--quiet"])
        .env("SITE_DOCTOR_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{path}\n")));
}

#[test]
fn test_config_flag_overrides_env() {
    let (_dir, env_path) = temp_config_path();
    let (_other, flag_path) = temp_config_path();
    site_doctor()
        .args(["config", "path", "--quiet", "--config", &flag_path])
        .env("SITE_DOCTOR_CONFIG", &env_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(flag_path.as_str()));
}
