//! Property-based tests for the polling state machine and shell quoting.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use proptest::prelude::*;

use site_doctor::application::services::status_poller::poll_until_live;
use site_doctor::domain::poll::{PollPolicy, reaches_done};
use site_doctor::domain::remote::{join_remote, shell_quote};
use site_doctor::domain::templates::env_value;

use crate::mocks::ScriptedProbe;

fn status_strategy() -> impl Strategy<Value = Option<u16>> {
    prop::option::of(prop_oneof![
        Just(200u16),
        Just(403u16),
        Just(404u16),
        Just(500u16),
        Just(503u16),
    ])
}

/// Undo `shell_quote` the way a POSIX shell would.
fn shell_unquote(quoted: &str) -> String {
    quoted[1..quoted.len() - 1].replace("'\\''", "'")
}

// ============================================================================
// poll_until_live() agrees with the pure state machine
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The poller is live exactly when a 200 occurs within the attempt budget.
    #[test]
    fn prop_poller_matches_state_machine(
        statuses in prop::collection::vec(status_strategy(), 0..12),
        budget in 0u32..12,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("runtime");
        let probe = ScriptedProbe::statuses(&statuses);
        let live = AtomicBool::new(false);
        let policy = PollPolicy {
            interval: Duration::ZERO,
            max_attempts: Some(budget),
            deadline: None,
            request_timeout: Duration::from_secs(1),
            summary_every: 0,
        };

        let outcome = runtime.block_on(poll_until_live(
            &probe,
            "https://shop.example.test/",
            &policy,
            &[],
            &live,
            |_| {},
        ));

        let expected = reaches_done(&statuses, budget);
        prop_assert_eq!(outcome.live, expected);
        prop_assert_eq!(live.load(Ordering::Acquire), expected);
        prop_assert!(outcome.attempts <= budget);
        if expected {
            let first_live = statuses.iter().position(|s| *s == Some(200)).expect("has 200");
            prop_assert_eq!(outcome.attempts as usize, first_live + 1);
        }
    }
}

// ============================================================================
// shell_quote() / join_remote() / env_value()
// ============================================================================

proptest! {
    /// Quoting is lossless and always yields one single-quoted word.
    #[test]
    fn prop_shell_quote_round_trips(value in ".{0,40}") {
        let quoted = shell_quote(&value);
        prop_assert!(quoted.starts_with('\'') && quoted.ends_with('\''));
        prop_assert_eq!(shell_unquote(&quoted), value);
    }

    /// Joined paths never contain a doubled separator at the seam.
    #[test]
    fn prop_join_remote_has_single_separator(
        root in "/[a-z]{1,10}(/[a-z]{1,10}){0,3}/?",
        relative in "/?[a-z]{1,10}(/[a-z.]{1,10}){0,2}",
    ) {
        let joined = join_remote(&root, &relative);
        prop_assert!(!joined.contains("//"), "doubled separator: {}", joined);
        prop_assert!(joined.starts_with(root.trim_end_matches('/')));
        prop_assert!(joined.ends_with(relative.trim_start_matches('/')));
    }

    /// Plain values stay bare; anything a dotenv parser would misread is quoted.
    #[test]
    fn prop_env_value_quotes_special_characters(value in "[ -~]{1,30}") {
        let rendered = env_value(&value);
        let special = value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '$' | '\\' | '='));
        if special {
            prop_assert!(rendered.starts_with('"') && rendered.ends_with('"'), "{}", rendered);
        } else {
            prop_assert_eq!(rendered, value);
        }
    }
}

#[test]
fn test_shell_quote_neutralises_metacharacters() {
    assert_eq!(shell_quote("a b"), "'a b'");
    assert_eq!(shell_quote("$(rm -rf /)"), "'$(rm -rf /)'");
    assert_eq!(shell_quote("it's"), "'it'\\''s'");
}
