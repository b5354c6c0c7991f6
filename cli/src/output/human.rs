//! Human-readable terminal renderer.

use std::path::Path;
use std::time::Duration;

use owo_colors::OwoColorize as _;

use crate::application::services::site_repair::RepairReport;
use crate::application::services::site_status::{EndpointStatus, LocalFileStatus, StatusReport};
use crate::application::services::status_poller::PollOutcome;
use crate::application::services::verification::VerifyOutcome;
use crate::domain::config::SiteConfig;
use crate::domain::deploy_log::EntryStatus;
use crate::domain::health::{CheckResult, DiagnosisReport};
use crate::domain::probe::{MonitorStats, Observation, SiteCondition, format_elapsed};
use crate::domain::remote::RemoteOutcome;
use crate::output::OutputContext;

/// Renders results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("site-doctor {version}");
    }

    /// Render named URLs, one per line.
    pub fn render_links(&self, links: &[(&str, String)]) {
        for (name, url) in links {
            println!(
                "  {:<16} {}",
                format!("{name}:").style(self.ctx.styles.dim),
                url.style(self.ctx.styles.link)
            );
        }
    }

    /// Render the status dashboard.
    pub fn render_status(&self, report: &StatusReport) {
        println!();
        println!(
            "  {}",
            format!("Site status ({})", report.checked_at.format("%Y-%m-%d %H:%M:%S"))
                .style(self.ctx.styles.header)
        );
        println!();
        self.print_endpoint("Website", &report.site);
        self.print_endpoint("Database setup", &report.db_setup);

        if !report.files.is_empty() {
            println!();
            println!("  Files:");
            for file in &report.files {
                self.print_file(file);
            }
        }
        if !report.logs.is_empty() {
            println!();
            println!("  Logs:");
            for file in &report.logs {
                self.print_file(file);
            }
        }
        println!();
    }

    fn print_endpoint(&self, label: &str, endpoint: &EndpointStatus) {
        let ok = endpoint.condition == SiteCondition::Live;
        self.print_check(ok, &format!("{label}: {}", endpoint_line(endpoint)));
        println!("      {}", endpoint.url.style(self.ctx.styles.link));
    }

    fn print_file(&self, file: &LocalFileStatus) {
        match file.size_mb() {
            Some(mb) => self.print_check(true, &format!("{} ({mb:.2} MB)", file.name)),
            None => self.print_check(false, &format!("{} (missing)", file.name)),
        }
    }

    /// Render one poll observation.
    pub fn render_observation(&self, observation: &Observation) {
        if self.ctx.quiet {
            return;
        }
        let time = observation.at.format("%H:%M:%S");
        let line = format!("[{time}] #{} {}", observation.attempt, observation.summary());
        match observation.condition {
            SiteCondition::Live => self.ctx.success(&line),
            SiteCondition::Deploying => self.ctx.info(&line),
            SiteCondition::FilesNotUploaded | SiteCondition::DomainNotConfigured => {
                self.ctx.warn(&line);
            }
        }
    }

    /// Render a periodic monitor summary.
    pub fn render_summary(&self, stats: &MonitorStats, elapsed: Duration) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header(&format!(
            "Summary after {} checks ({})",
            stats.total,
            format_elapsed(elapsed)
        ));
        self.ctx.kv(
            "success rate:",
            &format!("{:.1}% ({} ok, {} failed)", stats.success_rate(), stats.successful, stats.failed),
        );
        for (condition, count) in &stats.history {
            self.ctx.kv(&format!("{}:", condition.describe()), &count.to_string());
        }
        println!();
    }

    /// Render the end of a monitoring session.
    pub fn render_poll_outcome(&self, url: &str, outcome: &PollOutcome) {
        println!();
        let elapsed = format_elapsed(outcome.elapsed);
        if outcome.live {
            self.ctx.success(&format!(
                "{url} is live after {} checks ({elapsed})",
                outcome.attempts
            ));
        } else {
            let last = outcome
                .last_status
                .map_or_else(|| "no response".to_string(), |c| format!("HTTP {c}"));
            self.ctx.warn(&format!(
                "{url} not live after {} checks ({elapsed}); last: {last}",
                outcome.attempts
            ));
        }
        if let Some(markers) = &outcome.markers {
            for marker in &markers.found {
                self.print_check(true, &format!("found \"{marker}\""));
            }
            for marker in &markers.missing {
                self.print_check(false, &format!("missing \"{marker}\""));
            }
        }
        if let Some(body) = &outcome.last {
            let preview = body.preview(200).trim();
            if !preview.is_empty() && !self.ctx.quiet {
                println!();
                println!("  {}", "Response preview:".style(self.ctx.styles.dim));
                println!("  {preview}");
            }
        }
    }

    /// Render verification results.
    pub fn render_verification(&self, outcome: &VerifyOutcome) {
        let report = &outcome.report;
        println!();
        println!("  {}", "Final verification".style(self.ctx.styles.header));
        println!();
        for result in &report.results {
            let detail = match (result.status_code, &result.error) {
                (Some(code), _) => format!("HTTP {code}"),
                (None, Some(err)) => err.clone(),
                (None, None) => "no response".to_string(),
            };
            self.print_check(result.passed(), &format!("{}: {detail}", result.name));
            println!("      {}", result.url.style(self.ctx.styles.link));
        }
        println!();
        let summary = format!(
            "{}/{} endpoints passed ({:.1}%)",
            report.passed, report.total, report.success_rate
        );
        if report.verified {
            self.ctx.success(&format!("Deployment verified: {summary}"));
        } else {
            self.ctx.error(&format!("Deployment not verified: {summary}"));
        }
        if let Some(path) = &outcome.certificate {
            self.ctx.info(&format!("Certificate written to {}", path.display()));
        }
    }

    /// Render diagnosis results.
    pub fn render_diagnosis(&self, report: &DiagnosisReport, issues: &[String]) {
        println!();
        println!("  {}", "Site diagnosis".style(self.ctx.styles.header));
        println!();

        println!("  HTTP:");
        self.print_check(report.http.dns, "DNS resolves");
        let status = report
            .http
            .status_code
            .map_or_else(|| "no response".to_string(), |c| format!("HTTP {c}"));
        self.print_check(
            report.http.condition == SiteCondition::Live,
            &format!("{status}: {}", report.http.condition.describe()),
        );
        println!();

        if !report.remote.is_empty() {
            println!("  Remote:");
            for check in &report.remote {
                self.print_result(check);
            }
            println!();
        }

        if !report.recent_errors.is_empty() {
            println!("  Recent errors:");
            for line in &report.recent_errors {
                println!("    {}", line.style(self.ctx.styles.dim));
            }
            println!();
        }

        if issues.is_empty() {
            println!(
                "  {} Everything looks good!",
                "\u{2713}".style(self.ctx.styles.success)
            );
        } else {
            println!(
                "  {} Found {} issues:",
                "\u{2717}".style(self.ctx.styles.error),
                issues.len(),
            );
            for issue in issues {
                println!("    {} {issue}", "\u{2192}".style(self.ctx.styles.warning));
            }
        }
        println!();
    }

    /// Render the steps of a repair procedure.
    pub fn render_repair(&self, report: &RepairReport) {
        println!();
        let title = match report.procedure {
            "upload" => "Upload".to_string(),
            procedure => format!("Repair: {procedure}"),
        };
        println!("  {}", title.style(self.ctx.styles.header));
        println!();
        for step in &report.steps {
            let marker = match step.status {
                EntryStatus::Success => "\u{2713}".style(self.ctx.styles.success).to_string(),
                EntryStatus::Error => "\u{2717}".style(self.ctx.styles.error).to_string(),
                EntryStatus::Warning => "\u{26a0}".style(self.ctx.styles.warning).to_string(),
                EntryStatus::Info | EntryStatus::Progress => {
                    "\u{2022}".style(self.ctx.styles.info).to_string()
                }
            };
            println!("    {marker} {:<24} {}", step.name, step.detail);
        }
        println!();
        match report.site_status {
            Some(200) => self.ctx.success("Site answers HTTP 200"),
            Some(code) => self.ctx.warn(&format!(
                "Site answers HTTP {code}: {}",
                SiteCondition::classify(Some(code)).describe()
            )),
            None => {}
        }
        if report.failed() {
            self.ctx.error("Some steps failed; see above");
        }
    }

    /// Render a remote command outcome: stdout to stdout, stderr to stderr.
    pub fn render_exec(&self, outcome: &RemoteOutcome) {
        if !outcome.stdout.is_empty() {
            print!("{}", outcome.stdout);
        }
        if !outcome.stderr.is_empty() {
            eprint!("{}", outcome.stderr);
        }
        if let Some(err) = &outcome.error {
            self.ctx.error(&format!("connection failed: {err}"));
        } else if outcome.exit_code != 0 {
            self.ctx
                .error(&format!("remote command exited with code {}", outcome.exit_code));
        }
    }

    /// Render the resolved configuration. Secret files are shown by path only.
    pub fn render_config(&self, config: &SiteConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {:<24} {}", "site.name:", config.site.name);
        println!("  {:<24} {}", "site.url:", config.site.url);
        println!("  {:<24} {}", "site.project_root:", config.site.project_root);
        if let Some(panel) = &config.site.panel_url {
            println!("  {:<24} {panel}", "site.panel_url:");
        }
        println!(
            "  {:<24} {}",
            "remote:",
            if config.has_remote() {
                config.remote.display_target()
            } else {
                "(not configured)".to_string()
            }
        );
        println!(
            "  {:<24} {}",
            "remote.identity_file:",
            display_opt_path(config.remote.identity_file.as_deref())
        );
        println!(
            "  {:<24} {}",
            "remote.password_file:",
            display_opt_path(config.remote.password_file.as_deref())
        );
        println!("  {:<24} {}", "database.name:", config.database.name);
        println!("  {:<24} {}", "database.user:", config.database.user);
        println!(
            "  {:<24} {}",
            "database.password_file:",
            display_opt_path(config.database.password_file.as_deref())
        );
        println!(
            "  {:<24} {}s",
            "poll.interval:", config.poll.interval_secs
        );
        println!(
            "  {:<24} {}",
            "output_dir:",
            if config.output_dir.as_os_str().is_empty() {
                ".".to_string()
            } else {
                config.output_dir.display().to_string()
            }
        );
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["SITE_DOCTOR_CONFIG", "SITE_DOCTOR_LOG", "NO_COLOR"] {
            println!(
                "    {:<22} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!(
            "    {:<22} {}",
            format!("{}:", crate::domain::config::DB_PASSWORD_ENV),
            if std::env::var_os(crate::domain::config::DB_PASSWORD_ENV).is_some() {
                "(set)"
            } else {
                "(not set)"
            }
        );
        println!();
    }

    /// Render the location of a written or resolved file.
    pub fn render_path(&self, what: &str, path: &Path) {
        if self.ctx.quiet {
            println!("{}", path.display());
        } else {
            self.ctx.success(&format!("{what}: {}", path.display()));
        }
    }

    fn print_result(&self, check: &CheckResult) {
        self.print_check(check.passed, &format!("{}: {}", check.name, check.detail));
    }

    fn print_check(&self, ok: bool, msg: &str) {
        if ok {
            println!("    {} {msg}", "\u{2713}".style(self.ctx.styles.success));
        } else {
            println!("    {} {msg}", "\u{2717}".style(self.ctx.styles.error));
        }
    }
}

// ── Display helpers (used by tests and output layer) ─────────────────────────

/// `HTTP 200 in 120 ms (live and serving)` or the transport error.
#[must_use]
pub fn endpoint_line(endpoint: &EndpointStatus) -> String {
    match (endpoint.status_code, endpoint.response_ms, &endpoint.error) {
        (Some(code), Some(ms), _) => {
            format!("HTTP {code} in {ms} ms ({})", endpoint.condition.describe())
        }
        (Some(code), None, _) => format!("HTTP {code} ({})", endpoint.condition.describe()),
        (None, _, Some(err)) => format!("unreachable: {err}"),
        (None, _, None) => "unreachable".to_string(),
    }
}

#[must_use]
pub fn display_opt_path(path: Option<&Path>) -> String {
    path.map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
}
