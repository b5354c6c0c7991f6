//! Polling state machine and budget.
//!
//! Two states, one transition: `Polling -> Done` on a `200`.

use std::time::Duration;

use serde::Serialize;

use crate::domain::probe::SiteCondition;

/// State of a polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Polling,
    Done,
}

impl PollState {
    /// Advance on one observed status. `None` means the request failed.
    #[must_use]
    pub fn step(self, status: Option<u16>) -> Self {
        match self {
            Self::Done => Self::Done,
            Self::Polling if SiteCondition::classify(status).is_terminal() => Self::Done,
            Self::Polling => Self::Polling,
        }
    }
}

/// Limits on a polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Sleep between attempts.
    pub interval: Duration,
    /// Maximum number of attempts, if bounded.
    pub max_attempts: Option<u32>,
    /// Wall-clock budget, if bounded.
    pub deadline: Option<Duration>,
    /// Per-request timeout handed to the HTTP client.
    pub request_timeout: Duration,
    /// Print a summary every N attempts (0 disables).
    pub summary_every: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(20),
            max_attempts: Some(90),
            deadline: Some(Duration::from_secs(30 * 60)),
            request_timeout: Duration::from_secs(10),
            summary_every: 15,
        }
    }
}

impl PollPolicy {
    /// `true` when another attempt is allowed after `attempts` attempts and `elapsed` time.
    #[must_use]
    pub fn allows_attempt(&self, attempts: u32, elapsed: Duration) -> bool {
        let under_count = self.max_attempts.is_none_or(|max| attempts < max);
        let under_deadline = self.deadline.is_none_or(|d| elapsed < d);
        under_count && under_deadline
    }

    /// `true` when a periodic summary is due after `attempts` attempts.
    #[must_use]
    pub fn summary_due(&self, attempts: u32) -> bool {
        self.summary_every > 0 && attempts > 0 && attempts % self.summary_every == 0
    }
}

/// Run the state machine over a scripted sequence of statuses.
///
/// Returns `true` iff a `200` occurs within the first `budget` entries.
#[must_use]
pub fn reaches_done(statuses: &[Option<u16>], budget: u32) -> bool {
    let mut state = PollState::Polling;
    for status in statuses.iter().take(budget as usize) {
        state = state.step(*status);
        if state == PollState::Done {
            return true;
        }
    }
    false
}
