//! Application service — repair procedures for the common failure modes.
//!
//! `routing` targets the 403 case (rewrite rules, permissions), `app` the
//! 500 case (caches, key, storage), and `env` rebuilds `.env` and the
//! database state. Every step is appended to the deploy log.

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{DeployLogStore, HttpProbe, ProgressReporter, RemoteShell};
use crate::application::services::remote_exec::{
    DEFAULT_REMOTE_TIMEOUT, LONG_REMOTE_TIMEOUT, execute, push_file, write_heredoc,
};
use crate::application::services::site_diagnose::LOCAL_CURL;
use crate::domain::config::SiteConfig;
use crate::domain::deploy_log::{DeployLogEntry, EntryStatus};
use crate::domain::health::{error_lines, parse_http_code};
use crate::domain::remote::{RemoteOutcome, in_dir, join_remote, shell_quote};
use crate::domain::templates::{
    EnvTemplate, fingerprint, php_probe, public_htaccess, render_env, root_htaccess,
};

/// Caches cleared by `repair app`, in order.
pub const CACHE_CLEAR_COMMANDS: [&str; 5] = [
    "optimize:clear",
    "view:clear",
    "config:clear",
    "route:clear",
    "cache:clear",
];

/// File name of the temporary PHP probe written by `repair routing`.
pub const PHP_PROBE_FILE: &str = "site-doctor-probe.php";

const PHP_PROBE_MARKER: &str = "site-doctor-probe-ok";

// ── Result types ──────────────────────────────────────────────────────────────

/// One executed step.
#[derive(Debug, Clone, Serialize)]
pub struct RepairStep {
    pub name: String,
    pub status: EntryStatus,
    pub detail: String,
}

/// Steps of one procedure plus the final site status, if probed.
#[derive(Debug, Clone, Serialize)]
pub struct RepairReport {
    pub procedure: &'static str,
    pub steps: Vec<RepairStep>,
    pub site_status: Option<u16>,
}

impl RepairReport {
    /// `true` when any step ended in an error.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.steps.iter().any(|s| s.status == EntryStatus::Error)
    }
}

// ── Step runner ───────────────────────────────────────────────────────────────

/// Records each step to the reporter and the deploy log under one phase.
pub(crate) struct Procedure<'a, S, L, P> {
    pub(crate) shell: &'a S,
    log: &'a L,
    pub(crate) reporter: &'a P,
    pub(crate) root: &'a str,
    phase: &'static str,
    steps: Vec<RepairStep>,
}

impl<'a, S, L, P> Procedure<'a, S, L, P>
where
    S: RemoteShell,
    L: DeployLogStore,
    P: ProgressReporter,
{
    pub(crate) fn new(shell: &'a S, log: &'a L, reporter: &'a P, root: &'a str, phase: &'static str) -> Self {
        Self {
            shell,
            log,
            reporter,
            root,
            phase,
            steps: Vec::new(),
        }
    }

    pub(crate) async fn record(&mut self, name: &str, status: EntryStatus, detail: impl Into<String>) -> Result<()> {
        let detail = detail.into();
        let line = format!("{name}: {detail}");
        match status {
            EntryStatus::Success => self.reporter.success(&line),
            EntryStatus::Warning | EntryStatus::Error => self.reporter.warn(&line),
            EntryStatus::Info | EntryStatus::Progress => self.reporter.step(&line),
        }
        self.log
            .append(DeployLogEntry::now(self.phase, status, line))
            .await?;
        self.steps.push(RepairStep {
            name: name.to_string(),
            status,
            detail,
        });
        Ok(())
    }

    /// Record a remote outcome as a success or error step.
    pub(crate) async fn record_outcome(&mut self, name: &str, outcome: &RemoteOutcome) -> Result<()> {
        if outcome.success() {
            self.record(name, EntryStatus::Success, first_line_or(&outcome.stdout, "done"))
                .await
        } else {
            self.record(name, EntryStatus::Error, outcome.failure_summary())
                .await
        }
    }

    /// Run `command` inside the project root and record the outcome.
    pub(crate) async fn command(&mut self, name: &str, command: &str, timeout: Duration) -> Result<RemoteOutcome> {
        self.reporter.step(&format!("{name}..."));
        let outcome = execute(self.shell, &in_dir(self.root, command), Some(timeout)).await;
        self.record_outcome(name, &outcome).await?;
        Ok(outcome)
    }

    /// Confirm the project root exists. `false` means the procedure should stop.
    async fn check_root(&mut self) -> Result<bool> {
        self.reporter
            .step(&format!("connecting to {}...", self.shell.target()));
        let outcome = execute(
            self.shell,
            &format!("test -d {}", shell_quote(self.root)),
            None,
        )
        .await;
        if outcome.success() {
            self.record("project root", EntryStatus::Success, self.root)
                .await?;
            return Ok(true);
        }
        let detail = if outcome.is_transport_failure() {
            outcome.failure_summary()
        } else {
            format!("{} not found", self.root)
        };
        self.record("project root", EntryStatus::Error, detail)
            .await?;
        Ok(false)
    }

    async fn artisan(&mut self, args: &str, timeout: Duration) -> Result<RemoteOutcome> {
        self.command(&format!("artisan {args}"), &format!("php artisan {args}"), timeout)
            .await
    }

    pub(crate) fn finish(self, site_status: Option<u16>) -> RepairReport {
        RepairReport {
            procedure: self.phase,
            steps: self.steps,
            site_status,
        }
    }
}

fn first_line_or(text: &str, fallback: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

// ── Procedures ────────────────────────────────────────────────────────────────

/// Fix the 403 case: rewrite rules, permissions, and a PHP execution check.
///
/// # Errors
///
/// Returns an error if the deploy log cannot be written or a remote path is unusable.
pub async fn repair_routing(
    shell: &impl RemoteShell,
    probe: &impl HttpProbe,
    log: &impl DeployLogStore,
    reporter: &impl ProgressReporter,
    config: &SiteConfig,
) -> Result<RepairReport> {
    let root = config.site.project_root.as_str();
    let mut run = Procedure::new(shell, log, reporter, root, "routing");
    if !run.check_root().await? {
        return Ok(run.finish(None));
    }

    run.command(
        "public/index.php",
        "test -d public && test -f public/index.php",
        DEFAULT_REMOTE_TIMEOUT,
    )
    .await?;

    reporter.step("writing rewrite rules...");
    let outcome = write_heredoc(shell, &join_remote(root, ".htaccess"), root_htaccess()).await?;
    run.record_outcome(".htaccess", &outcome).await?;
    let outcome = write_heredoc(
        shell,
        &join_remote(root, "public/.htaccess"),
        public_htaccess(),
    )
    .await?;
    run.record_outcome("public/.htaccess", &outcome).await?;

    run.command(
        "permissions",
        "chmod -R 755 public && chmod 644 .htaccess public/.htaccess \
         && if [ -f public/index.php ]; then chmod 644 public/index.php; fi",
        DEFAULT_REMOTE_TIMEOUT,
    )
    .await?;

    php_execution_check(&mut run, probe, config).await?;

    reporter.step("checking local HTTP status...");
    let local = execute(shell, LOCAL_CURL, None).await;
    match parse_http_code(&local.stdout) {
        Some(code) if code < 400 => {
            run.record("local http", EntryStatus::Success, format!("HTTP {code}"))
                .await?;
        }
        Some(code) => {
            run.record("local http", EntryStatus::Warning, format!("HTTP {code}"))
                .await?;
        }
        None => {
            run.record("local http", EntryStatus::Warning, local.failure_summary())
                .await?;
        }
    }

    record_log_errors(&mut run).await?;

    let site_status = probe_site(&mut run, probe, config).await?;
    Ok(run.finish(site_status))
}

/// Fix the 500 case: clear caches, regenerate the key, fix storage, rebuild caches.
///
/// # Errors
///
/// Returns an error if the deploy log cannot be written.
pub async fn repair_app(
    shell: &impl RemoteShell,
    probe: &impl HttpProbe,
    log: &impl DeployLogStore,
    reporter: &impl ProgressReporter,
    config: &SiteConfig,
) -> Result<RepairReport> {
    let mut run = Procedure::new(shell, log, reporter, &config.site.project_root, "app");
    if !run.check_root().await? {
        return Ok(run.finish(None));
    }

    for cache in CACHE_CLEAR_COMMANDS {
        run.artisan(cache, LONG_REMOTE_TIMEOUT).await?;
    }
    run.artisan("key:generate --force", DEFAULT_REMOTE_TIMEOUT)
        .await?;
    run.command(
        "storage permissions",
        "chmod -R 775 storage bootstrap/cache",
        DEFAULT_REMOTE_TIMEOUT,
    )
    .await?;
    run.artisan("config:cache", LONG_REMOTE_TIMEOUT).await?;
    run.artisan("route:cache", LONG_REMOTE_TIMEOUT).await?;

    let site_status = probe_site(&mut run, probe, config).await?;
    Ok(run.finish(site_status))
}

/// Push a fresh `.env` and bring the database and caches in line with it.
///
/// `db_password` is `None` when no password was supplied; the placeholder is
/// rendered and migrations are skipped.
///
/// # Errors
///
/// Returns an error if the deploy log cannot be written or the `.env` path is unusable.
pub async fn repair_env(
    shell: &impl RemoteShell,
    log: &impl DeployLogStore,
    reporter: &impl ProgressReporter,
    config: &SiteConfig,
    db_password: Option<&str>,
) -> Result<RepairReport> {
    let root = config.site.project_root.as_str();
    let mut run = Procedure::new(shell, log, reporter, root, "env");
    if !run.check_root().await? {
        return Ok(run.finish(None));
    }

    let env = render_env(&EnvTemplate::from_config(config, db_password));
    reporter.step("uploading .env...");
    let outcome = push_file(shell, &join_remote(root, ".env"), env.as_bytes(), Some("600")).await?;
    if outcome.success() {
        run.record(
            ".env",
            EntryStatus::Success,
            format!("written, sha256 {}", fingerprint(env.as_bytes())),
        )
        .await?;
    } else {
        run.record(".env", EntryStatus::Error, outcome.failure_summary())
            .await?;
        return Ok(run.finish(None));
    }
    if db_password.is_none() {
        run.record(
            "database password",
            EntryStatus::Warning,
            "placeholder rendered; update DB_PASSWORD and rerun",
        )
        .await?;
    }

    run.artisan("key:generate --force", DEFAULT_REMOTE_TIMEOUT)
        .await?;
    run.artisan("config:clear", DEFAULT_REMOTE_TIMEOUT).await?;
    run.artisan("cache:clear", DEFAULT_REMOTE_TIMEOUT).await?;

    if db_password.is_some() {
        let db = run.artisan("db:show", DEFAULT_REMOTE_TIMEOUT).await?;
        if db.success() {
            run.artisan("migrate --force", LONG_REMOTE_TIMEOUT).await?;
        } else {
            run.record("migrations", EntryStatus::Warning, "skipped: no database connection")
                .await?;
        }
    }

    run.artisan("storage:link", DEFAULT_REMOTE_TIMEOUT).await?;
    for cache in ["config:cache", "route:cache", "view:cache"] {
        run.artisan(cache, LONG_REMOTE_TIMEOUT).await?;
    }

    Ok(run.finish(None))
}

// ── Shared steps ──────────────────────────────────────────────────────────────

async fn php_execution_check<S, L, P>(
    run: &mut Procedure<'_, S, L, P>,
    probe: &impl HttpProbe,
    config: &SiteConfig,
) -> Result<()>
where
    S: RemoteShell,
    L: DeployLogStore,
    P: ProgressReporter,
{
    let remote_path = join_remote(run.root, &format!("public/{PHP_PROBE_FILE}"));
    run.reporter.step("checking that PHP executes...");
    let written = write_heredoc(run.shell, &remote_path, &php_probe(PHP_PROBE_MARKER)).await?;
    if !written.success() {
        return run
            .record("php probe", EntryStatus::Warning, written.failure_summary())
            .await;
    }

    let url = config.site_url(PHP_PROBE_FILE);
    let result = probe.get(&url, config.poll.policy().request_timeout).await;
    let removed = execute(run.shell, &format!("rm -f {}", shell_quote(&remote_path)), None).await;

    match result {
        Ok(r) if r.status_code == 200 && r.body_snippet.contains(PHP_PROBE_MARKER) => {
            run.record("php probe", EntryStatus::Success, "PHP executes")
                .await?;
        }
        Ok(r) => {
            run.record(
                "php probe",
                EntryStatus::Warning,
                format!("HTTP {} without probe output", r.status_code),
            )
            .await?;
        }
        Err(e) => {
            run.record("php probe", EntryStatus::Warning, format!("{e:#}"))
                .await?;
        }
    }

    // A leftover probe stays publicly reachable.
    if removed.success() {
        run.record("php probe cleanup", EntryStatus::Success, "removed")
            .await
    } else {
        run.record(
            "php probe cleanup",
            EntryStatus::Error,
            format!("{remote_path} left in place: {}", removed.failure_summary()),
        )
        .await
    }
}

async fn record_log_errors<S, L, P>(run: &mut Procedure<'_, S, L, P>) -> Result<()>
where
    S: RemoteShell,
    L: DeployLogStore,
    P: ProgressReporter,
{
    let tail = execute(
        run.shell,
        &in_dir(run.root, "tail -n 50 storage/logs/laravel.log 2>/dev/null"),
        None,
    )
    .await;
    let errors = error_lines(&tail.stdout, 5);
    match errors.last() {
        None => {
            run.record("laravel.log", EntryStatus::Success, "no recent errors")
                .await
        }
        Some(last) => {
            run.record(
                "laravel.log",
                EntryStatus::Warning,
                format!("{} recent error(s), last: {last}", errors.len()),
            )
            .await
        }
    }
}

/// Fetch the site once and record the result as the `site` step.
async fn probe_site<S, L, P>(
    run: &mut Procedure<'_, S, L, P>,
    probe: &impl HttpProbe,
    config: &SiteConfig,
) -> Result<Option<u16>>
where
    S: RemoteShell,
    L: DeployLogStore,
    P: ProgressReporter,
{
    let site_status = probe
        .get(&config.site_url(""), config.poll.policy().request_timeout)
        .await
        .ok()
        .map(|r| r.status_code);
    let status = match site_status {
        Some(200) => EntryStatus::Success,
        _ => EntryStatus::Warning,
    };
    let detail = site_status.map_or_else(|| "unreachable".to_string(), |c| format!("HTTP {c}"));
    run.record("site", status, detail).await?;
    Ok(site_status)
}
