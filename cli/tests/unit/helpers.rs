//! Shared test helpers: exit statuses, process outputs and a sample configuration.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{ExitStatus, Output};

use site_doctor::domain::config::SiteConfig;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Configuration ────────────────────────────────────────────────────────────

pub const SITE_URL: &str = "https://shop.example.test";
pub const PROJECT_ROOT: &str = "/home/deploy/domains/shop.example.test/public_html";

/// A fully populated configuration pointing at documentation addresses.
pub fn sample_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.site.name = "Shop".to_string();
    config.site.url = SITE_URL.to_string();
    config.site.project_root = PROJECT_ROOT.to_string();
    config.site.markers = vec!["<title>Shop</title>".to_string()];
    config.site.required_files = vec!["deployment.zip".to_string()];
    config.remote.host = "203.0.113.10".to_string();
    config.remote.user = "deploy".to_string();
    config.database.name = "shop".to_string();
    config.database.user = "shop".to_string();
    config.output_dir = PathBuf::from("out");
    config
}

/// URL of `path` on the sample site.
pub fn url(path: &str) -> String {
    sample_config().site_url(path)
}
