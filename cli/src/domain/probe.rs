//! HTTP probe results and their fixed interpretation.
//!
//! Pure functions only: no I/O, no async.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Maximum number of body bytes kept from a probe response.
pub const MAX_BODY_SNIPPET: usize = 64 * 1024;

/// Result of one HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// HTTP status code.
    pub status_code: u16,
    /// Time until the response body was read.
    pub response_time: Duration,
    /// Start of the response body, at most [`MAX_BODY_SNIPPET`] bytes.
    pub body_snippet: String,
}

impl ProbeResult {
    /// First `max_chars` characters of the body, for display.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.body_snippet.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.body_snippet[..idx],
            None => &self.body_snippet,
        }
    }
}

/// Truncate `body` to at most [`MAX_BODY_SNIPPET`] bytes on a char boundary.
#[must_use]
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_BODY_SNIPPET {
        return body.to_string();
    }
    let mut end = MAX_BODY_SNIPPET;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}

/// Decode the first [`MAX_BODY_SNIPPET`] bytes of a raw body.
#[must_use]
pub fn snippet_from_bytes(bytes: &[u8]) -> String {
    let head = &bytes[..bytes.len().min(MAX_BODY_SNIPPET)];
    truncate_body(&String::from_utf8_lossy(head))
}

/// What a status code says about the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteCondition {
    /// `200`: the site is serving.
    Live,
    /// `403`: the document root exists but files are not uploaded yet.
    FilesNotUploaded,
    /// `404`: DNS or the domain mapping is not configured.
    DomainNotConfigured,
    /// Any other status, or no response at all.
    Deploying,
}

impl SiteCondition {
    /// Classify a status code. `None` means the request itself failed.
    #[must_use]
    pub fn classify(status: Option<u16>) -> Self {
        match status {
            Some(200) => Self::Live,
            Some(403) => Self::FilesNotUploaded,
            Some(404) => Self::DomainNotConfigured,
            _ => Self::Deploying,
        }
    }

    /// Only [`SiteCondition::Live`] ends a polling loop.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Live
    }

    /// Short operator-facing description.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Live => "live and serving",
            Self::FilesNotUploaded => "403 forbidden (files not uploaded yet)",
            Self::DomainNotConfigured => "404 not found (DNS/domain not configured)",
            Self::Deploying => "still deploying",
        }
    }
}

/// One polling iteration, as seen by the operator.
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Local wall-clock time of the check.
    pub at: DateTime<Local>,
    /// Status code, if a response arrived.
    pub status_code: Option<u16>,
    /// Response time in milliseconds, if a response arrived.
    pub response_ms: Option<u128>,
    /// Transport error, if no response arrived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Classification of this check.
    pub condition: SiteCondition,
}

impl Observation {
    /// Build an observation from a probe result or transport error.
    #[must_use]
    pub fn new(attempt: u32, result: &Result<ProbeResult, String>) -> Self {
        match result {
            Ok(probe) => Self {
                attempt,
                at: Local::now(),
                status_code: Some(probe.status_code),
                response_ms: Some(probe.response_time.as_millis()),
                error: None,
                condition: SiteCondition::classify(Some(probe.status_code)),
            },
            Err(e) => Self {
                attempt,
                at: Local::now(),
                status_code: None,
                response_ms: None,
                error: Some(e.clone()),
                condition: SiteCondition::Deploying,
            },
        }
    }

    /// One-line summary: `HTTP 403 (403 forbidden ...)` or `connection failed: ...`.
    #[must_use]
    pub fn summary(&self) -> String {
        match (self.status_code, &self.error) {
            (Some(code), _) => format!("HTTP {code}: {}", self.condition.describe()),
            (None, Some(err)) => format!("connection failed: {err}"),
            (None, None) => self.condition.describe().to_string(),
        }
    }
}

/// Running counters over a monitoring session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorStats {
    /// Number of checks issued.
    pub total: u32,
    /// Checks that returned `200`.
    pub successful: u32,
    /// Checks that did not.
    pub failed: u32,
    /// Count per condition, in first-seen order.
    pub history: Vec<(SiteCondition, u32)>,
}

impl MonitorStats {
    /// Record one observation.
    pub fn record(&mut self, observation: &Observation) {
        self.total += 1;
        if observation.condition == SiteCondition::Live {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        match self
            .history
            .iter_mut()
            .find(|(cond, _)| *cond == observation.condition)
        {
            Some((_, count)) => *count += 1,
            None => self.history.push((observation.condition, 1)),
        }
    }

    /// Percentage of successful checks, `0.0` before any check.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.successful) * 100.0 / f64::from(self.total)
        }
    }
}

/// Format a duration as `H:MM:SS`, or `M:SS` under an hour.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Which expected substrings appear in a body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkerCheck {
    /// Markers found in the body.
    pub found: Vec<String>,
    /// Markers missing from the body.
    pub missing: Vec<String>,
}

impl MarkerCheck {
    /// Check each marker against `body`.
    #[must_use]
    pub fn run(body: &str, markers: &[String]) -> Self {
        let (found, missing) = markers
            .iter()
            .cloned()
            .partition(|m| body.contains(m.as_str()));
        Self { found, missing }
    }

    /// `true` when every marker was found (vacuously true with no markers).
    #[must_use]
    pub fn all_found(&self) -> bool {
        self.missing.is_empty()
    }
}
