//! Application service — poll the site until it answers `200`.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::application::ports::HttpProbe;
use crate::domain::poll::{PollPolicy, PollState};
use crate::domain::probe::{MarkerCheck, MonitorStats, Observation, ProbeResult};

/// Events emitted while polling, for the caller to render.
pub enum PollEvent<'a> {
    /// One check completed.
    Observed(&'a Observation),
    /// Periodic summary after `summary_every` attempts.
    Summary {
        stats: &'a MonitorStats,
        elapsed: Duration,
    },
}

/// Result of a polling session.
#[derive(Debug, Clone, Serialize)]
pub struct PollOutcome {
    /// Whether the site answered `200` within the budget.
    pub live: bool,
    /// Number of checks issued.
    pub attempts: u32,
    /// Wall-clock time spent polling.
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Last response received, if any.
    #[serde(skip)]
    pub last: Option<ProbeResult>,
    /// Last observed status code, if any response arrived.
    pub last_status: Option<u16>,
    /// Marker check on the live body (only when live).
    pub markers: Option<MarkerCheck>,
    /// Running counters.
    pub stats: MonitorStats,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's serialize_with signature
fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}

/// Poll `url` until it answers `200` or the policy's budget runs out.
///
/// HTTP errors count as failed checks and never abort the loop. `live` is
/// set with `Release` ordering as soon as the site is up, so a concurrent
/// reader can observe it with `Acquire`.
pub async fn poll_until_live(
    probe: &impl HttpProbe,
    url: &str,
    policy: &PollPolicy,
    markers: &[String],
    live: &AtomicBool,
    mut observer: impl FnMut(PollEvent<'_>),
) -> PollOutcome {
    let started = Instant::now();
    let mut state = PollState::Polling;
    let mut attempts = 0u32;
    let mut stats = MonitorStats::default();
    let mut last: Option<ProbeResult> = None;

    while policy.allows_attempt(attempts, started.elapsed()) {
        attempts += 1;
        tracing::debug!(%url, attempt = attempts, "poll");
        let result = probe
            .get(url, policy.request_timeout)
            .await
            .map_err(|e| format!("{e:#}"));
        let observation = Observation::new(attempts, &result);
        stats.record(&observation);
        observer(PollEvent::Observed(&observation));

        state = state.step(observation.status_code);
        if let Ok(response) = result {
            last = Some(response);
        }
        if state == PollState::Done {
            live.store(true, Ordering::Release);
            break;
        }

        if policy.summary_due(attempts) {
            observer(PollEvent::Summary {
                stats: &stats,
                elapsed: started.elapsed(),
            });
        }
        if !policy.allows_attempt(attempts, started.elapsed()) {
            break;
        }
        tokio::time::sleep(policy.interval).await;
    }

    let live_now = state == PollState::Done;
    let markers = live_now
        .then(|| last.as_ref().map(|r| MarkerCheck::run(&r.body_snippet, markers)))
        .flatten();

    PollOutcome {
        live: live_now,
        attempts,
        elapsed: started.elapsed(),
        last_status: last.as_ref().map(|r| r.status_code),
        last,
        markers,
        stats,
    }
}
