//! Verification service: endpoint verdict, certificate and deploy-log entry.

#![allow(clippy::expect_used)]

use site_doctor::application::services::verification::{CERTIFICATE_FILE, run_verification};
use site_doctor::domain::deploy_log::EntryStatus;
use site_doctor::output::SilentReporter;

use crate::helpers::{sample_config, url};
use crate::mocks::{MemoryFiles, MemoryLog, ScriptedProbe};

fn probe_with(admin: u16) -> ScriptedProbe {
    ScriptedProbe::by_url(&[
        (url(""), 200),
        (url("database_setup.php"), 200),
        (url("admin"), admin),
        (url("api/health"), 200),
    ])
}

#[tokio::test]
async fn three_of_four_passes_and_writes_certificate() {
    let probe = probe_with(500);
    let files = MemoryFiles::new();
    let log = MemoryLog::new();

    let outcome = run_verification(&probe, &files, &log, &SilentReporter, &sample_config())
        .await
        .expect("verification runs");

    assert!(outcome.report.verified);
    assert_eq!(outcome.report.passed, 3);
    assert_eq!(outcome.report.total, 4);
    assert!(outcome.certificate.is_some());
    let cert = files.contents(CERTIFICATE_FILE).expect("certificate written");
    assert!(cert.contains("https://shop.example.test"));

    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].phase, "verify");
    assert_eq!(entries[0].status, EntryStatus::Success);
    assert!(entries[0].details.contains("3/4"));
}

#[tokio::test]
async fn two_of_four_fails_without_certificate() {
    let probe = ScriptedProbe::by_url(&[(url(""), 200), (url("api/health"), 200)]);
    let files = MemoryFiles::new();
    let log = MemoryLog::new();

    let outcome = run_verification(&probe, &files, &log, &SilentReporter, &sample_config())
        .await
        .expect("verification runs");

    assert!(!outcome.report.verified);
    assert!(outcome.certificate.is_none());
    assert!(files.written().is_empty());
    assert_eq!(log.entries()[0].status, EntryStatus::Error);
    let unreachable = outcome
        .report
        .results
        .iter()
        .filter(|r| r.error.is_some())
        .count();
    assert_eq!(unreachable, 2);
}

#[tokio::test]
async fn endpoints_are_checked_in_order() {
    let probe = probe_with(200);
    run_verification(
        &probe,
        &MemoryFiles::new(),
        &MemoryLog::new(),
        &SilentReporter,
        &sample_config(),
    )
    .await
    .expect("verification runs");

    assert_eq!(
        probe.calls(),
        vec![
            url(""),
            url("database_setup.php"),
            url("admin"),
            url("api/health")
        ]
    );
}
