//! `site-doctor monitor` — poll the site until it is live.

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use serde_json::json;
use tokio::sync::oneshot;

use crate::app::AppContext;
use crate::application::ports::DeployLogStore;
use crate::application::services::status_poller::{PollEvent, PollOutcome, poll_until_live};
use crate::domain::config::SiteConfig;
use crate::domain::deploy_log::{DeployLogEntry, EntryStatus};
use crate::domain::poll::PollPolicy;
use crate::domain::probe::format_elapsed;
use crate::infra::http::ReqwestProbe;
use crate::output::JsonRenderer;

/// Arguments for the monitor command.
#[derive(Args)]
pub struct MonitorArgs {
    /// Seconds between checks
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Stop after this many checks (0 for unbounded)
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Stop after this many seconds (0 for unbounded)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Keep polling until Enter is pressed
    #[arg(long)]
    pub wait_for_enter: bool,
}

impl MonitorArgs {
    /// Apply command-line overrides on top of the configured policy.
    #[must_use]
    pub fn policy(&self, base: PollPolicy) -> PollPolicy {
        PollPolicy {
            interval: self.interval.map_or(base.interval, Duration::from_secs),
            max_attempts: match self.max_attempts {
                Some(0) => None,
                Some(n) => Some(n),
                None => base.max_attempts,
            },
            deadline: match self.timeout {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => base.deadline,
            },
            ..base
        }
    }
}

enum Ending {
    Finished(PollOutcome),
    Stopped,
}

/// Poll the site URL until it answers `200`, the budget runs out, Ctrl-C,
/// or (with `--wait-for-enter`) the operator presses Enter.
///
/// Exits `0` only when the site went live; an interrupted run exits `1`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the deploy log
/// cannot be written.
pub async fn run(app: &AppContext, args: &MonitorArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let probe = ReqwestProbe::new()?;
    let policy = args.policy(config.poll.policy());
    let url = config.site_url("");
    let live = AtomicBool::new(false);
    let renderer = app.renderer();

    if !app.is_json() {
        app.output.info(&format!(
            "Monitoring {url} every {}s{}",
            policy.interval.as_secs(),
            if args.wait_for_enter {
                " (press Enter to stop)"
            } else {
                ""
            }
        ));
    }

    let poll = poll_until_live(
        &probe,
        &url,
        &policy,
        &config.site.markers,
        &live,
        |event| match event {
            PollEvent::Observed(observation) => renderer.render_observation(observation),
            PollEvent::Summary { stats, elapsed } => renderer.render_summary(stats, elapsed),
        },
    );

    let ending = if args.wait_for_enter {
        let enter = enter_pressed();
        tokio::select! {
            outcome = poll => Ending::Finished(outcome),
            Ok(()) = enter => Ending::Stopped,
            _ = tokio::signal::ctrl_c() => Ending::Stopped,
        }
    } else {
        tokio::select! {
            outcome = poll => Ending::Finished(outcome),
            _ = tokio::signal::ctrl_c() => Ending::Stopped,
        }
    };

    match ending {
        Ending::Finished(outcome) => {
            record(&config, &url, &outcome).await?;
            renderer.render_poll_outcome(&url, &outcome)?;
            Ok(if outcome.live {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Ending::Stopped => {
            let was_live = live.load(Ordering::Acquire);
            if app.is_json() {
                JsonRenderer::print(&json!({ "url": url, "stopped": true, "live": was_live }))?;
            } else {
                println!();
                app.output.warn("monitoring stopped");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Resolve once a line is read from stdin. EOF never resolves.
fn enter_pressed() -> oneshot::Receiver<()> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        if matches!(std::io::stdin().read_line(&mut line), Ok(n) if n > 0) {
            let _ = tx.send(());
        }
    });
    rx
}

async fn record(config: &SiteConfig, url: &str, outcome: &PollOutcome) -> Result<()> {
    let (status, details) = if outcome.live {
        (
            EntryStatus::Success,
            format!(
                "{url} live after {} checks ({})",
                outcome.attempts,
                format_elapsed(outcome.elapsed)
            ),
        )
    } else {
        (
            EntryStatus::Warning,
            format!(
                "{url} not live after {} checks; last status {}",
                outcome.attempts,
                outcome
                    .last_status
                    .map_or_else(|| "none".to_string(), |c| c.to_string())
            ),
        )
    };
    AppContext::deploy_log(config)
        .append(DeployLogEntry::now("monitor", status, details))
        .await
}
