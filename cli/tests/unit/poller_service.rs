//! Status poller driven by a scripted probe.

#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use site_doctor::application::services::status_poller::{PollEvent, poll_until_live};
use site_doctor::domain::config::PollConfig;
use site_doctor::domain::poll::PollPolicy;
use site_doctor::domain::probe::SiteCondition;

use crate::mocks::ScriptedProbe;

fn policy(max_attempts: u32) -> PollPolicy {
    PollPolicy {
        interval: Duration::ZERO,
        max_attempts: Some(max_attempts),
        deadline: None,
        request_timeout: Duration::from_secs(1),
        summary_every: 0,
    }
}

#[tokio::test]
async fn stops_at_first_200_and_sets_live_flag() {
    let probe = ScriptedProbe::statuses(&[Some(403), None, Some(404), Some(200), Some(200)])
        .with_body("<html><title>Shop</title></html>");
    let live = AtomicBool::new(false);
    let mut seen = Vec::new();

    let outcome = poll_until_live(
        &probe,
        "https://shop.example.test/",
        &policy(10),
        &["<title>Shop</title>".to_string(), "Welcome".to_string()],
        &live,
        |event| {
            if let PollEvent::Observed(o) = event {
                seen.push(o.condition);
            }
        },
    )
    .await;

    assert!(outcome.live);
    assert!(live.load(Ordering::Acquire));
    assert_eq!(outcome.attempts, 4);
    assert_eq!(probe.calls().len(), 4, "no request after the site is live");
    assert_eq!(
        seen,
        vec![
            SiteCondition::FilesNotUploaded,
            SiteCondition::Deploying,
            SiteCondition::DomainNotConfigured,
            SiteCondition::Live,
        ]
    );
    let markers = outcome.markers.expect("marker check on live body");
    assert_eq!(markers.found, vec!["<title>Shop</title>"]);
    assert_eq!(markers.missing, vec!["Welcome"]);
    assert_eq!(outcome.stats.successful, 1);
    assert_eq!(outcome.stats.failed, 3);
}

#[tokio::test]
async fn zero_limits_from_configuration_still_poll() {
    let probe = ScriptedProbe::statuses(&[Some(403), Some(200)]);
    let live = AtomicBool::new(false);
    let config = PollConfig {
        interval_secs: 0,
        max_attempts: Some(0),
        timeout_secs: Some(0),
        request_timeout_secs: 1,
        summary_every: 0,
    };

    let outcome = poll_until_live(
        &probe,
        "https://shop.example.test/",
        &config.policy(),
        &[],
        &live,
        |_| {},
    )
    .await;

    assert!(outcome.live);
    assert_eq!(outcome.attempts, 2);
}

#[tokio::test]
async fn exhausted_budget_is_not_live() {
    let probe = ScriptedProbe::statuses(&[Some(403), Some(403), Some(403)]);
    let live = AtomicBool::new(false);

    let outcome = poll_until_live(
        &probe,
        "https://shop.example.test/",
        &policy(3),
        &[],
        &live,
        |_| {},
    )
    .await;

    assert!(!outcome.live);
    assert!(!live.load(Ordering::Acquire));
    assert_eq!(outcome.attempts, 3);
    assert_eq!(outcome.last_status, Some(403));
    assert!(outcome.markers.is_none());
}

#[tokio::test]
async fn connection_errors_never_abort_the_loop() {
    let probe = ScriptedProbe::statuses(&[None, None, Some(200)]);
    let live = AtomicBool::new(false);

    let outcome = poll_until_live(
        &probe,
        "https://shop.example.test/",
        &policy(5),
        &[],
        &live,
        |_| {},
    )
    .await;

    assert!(outcome.live);
    assert_eq!(outcome.attempts, 3);
}

#[tokio::test]
async fn summaries_follow_the_configured_cadence() {
    let probe = ScriptedProbe::statuses(&[Some(500); 7]);
    let live = AtomicBool::new(false);
    let mut summaries = Vec::new();
    let policy = PollPolicy {
        summary_every: 3,
        ..policy(7)
    };

    poll_until_live(
        &probe,
        "https://shop.example.test/",
        &policy,
        &[],
        &live,
        |event| {
            if let PollEvent::Summary { stats, .. } = event {
                summaries.push(stats.total);
            }
        },
    )
    .await;

    assert_eq!(summaries, vec![3, 6]);
}
