//! Status dashboard: both probes plus the local file inventory.

use std::path::Path;

use site_doctor::application::services::site_status::gather_status;
use site_doctor::domain::probe::SiteCondition;

use crate::helpers::{sample_config, url};
use crate::mocks::{MemoryFiles, ScriptedProbe};

#[tokio::test]
async fn live_site_with_missing_db_setup() {
    let probe = ScriptedProbe::by_url(&[(url(""), 200), (url("database_setup.php"), 404)]);
    let files = MemoryFiles::new().with_file("deployment.zip", 3 * 1024 * 1024);

    let report = gather_status(&probe, &files, &sample_config()).await;

    assert!(report.is_live());
    assert_eq!(report.site.status_code, Some(200));
    assert_eq!(report.db_setup.condition, SiteCondition::DomainNotConfigured);
    assert_eq!(report.files.len(), 1);
    assert!(report.files[0].present());
    assert_eq!(report.files[0].size_mb(), Some(3.0));
}

#[tokio::test]
async fn logs_resolve_against_the_output_dir() {
    let probe = ScriptedProbe::by_url(&[]);
    let files = MemoryFiles::new().with_file(Path::new("out").join("deployment_log.json"), 42);

    let report = gather_status(&probe, &files, &sample_config()).await;

    assert!(!report.is_live());
    assert!(report.site.error.is_some());
    assert_eq!(report.site.condition, SiteCondition::Deploying);
    assert!(!report.files[0].present());
    assert_eq!(report.logs[0].name, "deployment_log.json");
    assert_eq!(report.logs[0].size_bytes, Some(42));
}
