//! Diagnosis check types and pure diagnostic functions.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! All functions take data in and return data out.

use serde::Serialize;

use crate::domain::probe::SiteCondition;

/// Minimum PHP version a current Laravel release runs on.
pub const MIN_PHP_VERSION: (u64, u64, u64) = (8, 1, 0);

// ── Types ─────────────────────────────────────────────────────────────────────

/// One named check with a verdict and a detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Short check name, e.g. `public/index.php`.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// What was observed.
    pub detail: String,
}

impl CheckResult {
    #[must_use]
    pub fn pass(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn fail(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            detail: detail.into(),
        }
    }
}

/// Everything `diagnose` found.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisReport {
    /// HTTP-side checks.
    pub http: HttpChecks,
    /// Checks run on the remote host.
    pub remote: Vec<CheckResult>,
    /// Recent error lines from the application log.
    pub recent_errors: Vec<String>,
}

/// HTTP-side checks.
#[derive(Debug, Clone, Serialize)]
pub struct HttpChecks {
    /// Whether the site host resolves.
    pub dns: bool,
    /// Status code of the site URL, if any response arrived.
    pub status_code: Option<u16>,
    /// Classification of that status.
    pub condition: SiteCondition,
}

impl DiagnosisReport {
    /// Look up a remote check by name.
    #[must_use]
    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.remote.iter().find(|c| c.name == name)
    }
}

// ── Check names ───────────────────────────────────────────────────────────────

pub const CHECK_REMOTE_SESSION: &str = "ssh session";
pub const CHECK_PROJECT_ROOT: &str = "project root";
pub const CHECK_PUBLIC_DIR: &str = "public/";
pub const CHECK_PUBLIC_INDEX: &str = "public/index.php";
pub const CHECK_ROOT_HTACCESS: &str = ".htaccess";
pub const CHECK_ENV_FILE: &str = ".env";
pub const CHECK_PHP_VERSION: &str = "php version";
pub const CHECK_ARTISAN: &str = "artisan";
pub const CHECK_STORAGE: &str = "storage writable";
pub const CHECK_LOCAL_HTTP: &str = "local http";
pub const CHECK_USER_INI: &str = ".user.ini";

// ── Pure functions ────────────────────────────────────────────────────────────

/// Extract the PHP version from `php -v` output (`PHP 8.2.12 (cli) ...`).
#[must_use]
pub fn parse_php_version(output: &str) -> Option<semver::Version> {
    let first = output.lines().next()?;
    let raw = first.strip_prefix("PHP ")?.split_whitespace().next()?;
    // Distribution suffixes such as `8.1.2-1ubuntu2.14` are not valid semver pre-releases.
    let core: String = raw
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    semver::Version::parse(core.trim_end_matches('.')).ok()
}

/// `true` when `version` meets [`MIN_PHP_VERSION`].
#[must_use]
pub fn php_version_ok(version: &semver::Version) -> bool {
    let (major, minor, patch) = MIN_PHP_VERSION;
    *version >= semver::Version::new(major, minor, patch)
}

/// Keep the lines of a Laravel log tail that record errors.
#[must_use]
pub fn error_lines(log_tail: &str, limit: usize) -> Vec<String> {
    let pattern = regex::Regex::new(r"\.(ERROR|CRITICAL|ALERT|EMERGENCY):");
    let Ok(pattern) = pattern else {
        return Vec::new();
    };
    let mut lines: Vec<String> = log_tail
        .lines()
        .filter(|l| pattern.is_match(l))
        .map(|l| l.trim().to_string())
        .collect();
    if lines.len() > limit {
        lines.drain(..lines.len() - limit);
    }
    lines
}

/// Parse the output of `curl -w '%{http_code}'`.
#[must_use]
pub fn parse_http_code(output: &str) -> Option<u16> {
    let code: u16 = output.trim().parse().ok()?;
    (code != 0).then_some(code)
}

/// Collect human-readable issues from a diagnosis.
#[must_use]
pub fn collect_issues(report: &DiagnosisReport) -> Vec<String> {
    let mut issues = Vec::new();

    if !report.http.dns {
        issues.push("Site host does not resolve: check the domain's DNS records".to_string());
    }
    match report.http.condition {
        SiteCondition::Live => {}
        SiteCondition::FilesNotUploaded => issues.push(
            "Site returns 403: upload the application or run 'site-doctor repair routing'"
                .to_string(),
        ),
        SiteCondition::DomainNotConfigured => {
            issues.push("Site returns 404: the domain is not mapped to the project yet".to_string());
        }
        SiteCondition::Deploying => match report.http.status_code {
            Some(code) if code >= 500 => issues.push(format!(
                "Site returns {code}: run 'site-doctor repair app' and check the application log"
            )),
            Some(code) => issues.push(format!("Site returns unexpected status {code}")),
            None => issues.push("Site is unreachable over HTTP".to_string()),
        },
    }

    for check in report.remote.iter().filter(|c| !c.passed) {
        issues.push(format!("{}: {}", check.name, check.detail));
    }

    if !report.recent_errors.is_empty() {
        issues.push(format!(
            "{} recent error(s) in the application log",
            report.recent_errors.len()
        ));
    }

    issues
}
