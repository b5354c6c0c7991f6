//! Guide, report and `.env` artifacts written through the artifact port.

#![allow(clippy::expect_used)]

use chrono::{Local, TimeZone};

use site_doctor::application::ports::DeployLogStore;
use site_doctor::application::services::artifacts::{
    GUIDE_FILE, render_env_file, write_guide, write_report,
};
use site_doctor::domain::deploy_log::{DeployLogEntry, EntryStatus};

use crate::helpers::sample_config;
use crate::mocks::{MemoryFiles, MemoryLog};

#[test]
fn guide_is_written_under_its_fixed_name() {
    let files = MemoryFiles::new();
    let path = write_guide(&files, &sample_config()).expect("guide");
    assert!(path.ends_with(GUIDE_FILE));
    let guide = files.contents(GUIDE_FILE).expect("written");
    assert!(guide.starts_with("# Shop Quick Deployment Guide"));
    assert!(guide.contains("https://shop.example.test/"));
}

#[tokio::test]
async fn report_is_timestamped_and_counts_entries() {
    let log = MemoryLog::new();
    log.append(DeployLogEntry::now("verify", EntryStatus::Success, "4/4 endpoints passed"))
        .await
        .expect("append");
    log.append(DeployLogEntry::now("app", EntryStatus::Error, "artisan key:generate | failed"))
        .await
        .expect("append");
    let files = MemoryFiles::new();
    let at = Local
        .with_ymd_and_hms(2026, 10, 16, 9, 30, 0)
        .single()
        .expect("valid time");

    let (path, count) = write_report(&log, &files, &sample_config(), at)
        .await
        .expect("report");

    assert_eq!(count, 2);
    assert!(path.ends_with("deployment_report_20261016_093000.md"));
    let (_, markdown) = files.written().pop().expect("written");
    assert!(markdown.starts_with("# Shop Deployment Report"));
    assert!(markdown.contains("- Errors: 1"));
    assert!(markdown.contains("4/4 endpoints passed"));
}

#[tokio::test]
async fn empty_log_still_produces_a_report() {
    let files = MemoryFiles::new();
    let (_, count) = write_report(&MemoryLog::new(), &files, &sample_config(), Local::now())
        .await
        .expect("report");
    assert_eq!(count, 0);
    assert!(files.written()[0].1.contains("_No entries recorded._"));
}

#[test]
fn env_file_uses_configured_site_and_database() {
    let env = render_env_file(&sample_config(), Some("pw"));
    assert!(env.contains("APP_NAME=Shop"));
    assert!(env.contains("APP_URL=https://shop.example.test"));
    assert!(env.contains("DB_DATABASE=shop"));
    assert!(env.contains("DB_PASSWORD=pw"));
}
