//! Append-only deployment log.
//!
//! Written for human review; only ever read back to append or re-render.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of one log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Info,
    Success,
    Warning,
    Error,
    Progress,
}

impl EntryStatus {
    /// Upper-case label used in Markdown tables.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Progress => "PROGRESS",
        }
    }
}

/// One `{phase, status, details, timestamp}` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployLogEntry {
    pub phase: String,
    pub status: EntryStatus,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl DeployLogEntry {
    /// New entry stamped with the current UTC time.
    #[must_use]
    pub fn now(phase: &str, status: EntryStatus, details: impl Into<String>) -> Self {
        Self {
            phase: phase.to_string(),
            status,
            details: details.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered list of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployLog {
    entries: Vec<DeployLogEntry>,
}

impl DeployLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: DeployLogEntry) {
        self.entries.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[DeployLogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with the given status.
    #[must_use]
    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Render as a Markdown report with a summary and one table row per entry.
    #[must_use]
    pub fn to_markdown(&self, title: &str, generated_at: DateTime<Utc>) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "# {title}");
        let _ = writeln!(md);
        let _ = writeln!(
            md,
            "Generated: {}",
            generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(md);
        let _ = writeln!(md, "## Summary");
        let _ = writeln!(md);
        let _ = writeln!(md, "- Entries: {}", self.entries.len());
        let _ = writeln!(md, "- Successes: {}", self.count(EntryStatus::Success));
        let _ = writeln!(md, "- Warnings: {}", self.count(EntryStatus::Warning));
        let _ = writeln!(md, "- Errors: {}", self.count(EntryStatus::Error));
        let _ = writeln!(md);
        let _ = writeln!(md, "## Log");
        let _ = writeln!(md);
        if self.entries.is_empty() {
            let _ = writeln!(md, "_No entries recorded._");
            return md;
        }
        let _ = writeln!(md, "| Time | Phase | Status | Details |");
        let _ = writeln!(md, "|------|-------|--------|---------|");
        for entry in &self.entries {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} |",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                escape_cell(&entry.phase),
                entry.status.label(),
                escape_cell(&entry.details),
            );
        }
        md
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}
