//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;
use serde_json::json;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::{Reporter, SilentReporter, TerminalReporter};
pub use styles::Styles;

use crate::application::services::site_repair::RepairReport;
use crate::application::services::site_status::StatusReport;
use crate::application::services::status_poller::PollOutcome;
use crate::application::services::verification::VerifyOutcome;
use crate::domain::config::SiteConfig;
use crate::domain::health::DiagnosisReport;
use crate::domain::probe::{MonitorStats, Observation};
use crate::domain::remote::RemoteOutcome;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Human or JSON rendering, chosen once per invocation.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render the CLI version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_version(version);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::print(&json!({ "version": version })),
        }
    }

    /// Render named URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_links(&self, links: &[(&str, String)]) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_links(links);
                Ok(())
            }
            Self::Json(_) => {
                let map: serde_json::Map<String, serde_json::Value> = links
                    .iter()
                    .map(|(name, url)| ((*name).to_string(), json!(url)))
                    .collect();
                JsonRenderer::print(&map)
            }
        }
    }

    /// Render the status dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_status(&self, report: &StatusReport) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_status(report);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::print(report),
        }
    }

    /// Render one poll observation (human mode only).
    pub fn render_observation(&self, observation: &Observation) {
        if let Self::Human(h) = self {
            h.render_observation(observation);
        }
    }

    /// Render a periodic monitor summary (human mode only).
    pub fn render_summary(&self, stats: &MonitorStats, elapsed: Duration) {
        if let Self::Human(h) = self {
            h.render_summary(stats, elapsed);
        }
    }

    /// Render the end of a monitoring session.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_poll_outcome(&self, url: &str, outcome: &PollOutcome) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_poll_outcome(url, outcome);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::print(&json!({ "url": url, "outcome": outcome })),
        }
    }

    /// Render verification results.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_verification(&self, outcome: &VerifyOutcome) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_verification(outcome);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::print(outcome),
        }
    }

    /// Render diagnosis results and the derived issues.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_diagnosis(&self, report: &DiagnosisReport, issues: &[String]) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_diagnosis(report, issues);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::print(&json!({ "diagnosis": report, "issues": issues })),
        }
    }

    /// Render the steps of a repair procedure.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_repair(&self, report: &RepairReport) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_repair(report);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::print(report),
        }
    }

    /// Render a remote command outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_exec(&self, command: &str, outcome: &RemoteOutcome) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_exec(outcome);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::print(&json!({ "command": command, "outcome": outcome })),
        }
    }

    /// Render the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &SiteConfig, path: &Path) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_config(config, path);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::print(&json!({
                "path": path.display().to_string(),
                "config": config,
            })),
        }
    }

    /// Render the location of a written or resolved file.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_path(&self, what: &str, path: &Path) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_path(what, path);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::print(&json!({
                "kind": what,
                "path": path.display().to_string(),
            })),
        }
    }

    /// Render `.env` contents to stdout; JSON wraps them with the placeholder flag.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_env(&self, contents: &str, placeholder: bool) -> Result<()> {
        match self {
            Self::Human(_) => {
                print!("{contents}");
                Ok(())
            }
            Self::Json(_) => JsonRenderer::print(&json!({
                "env": contents,
                "password_placeholder": placeholder,
            })),
        }
    }
}
