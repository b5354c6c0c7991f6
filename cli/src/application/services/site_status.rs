//! Application service — one-shot status dashboard.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::application::ports::{FileInventory, HttpProbe};
use crate::domain::config::SiteConfig;
use crate::domain::probe::SiteCondition;

/// One probed URL.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointStatus {
    pub url: String,
    pub status_code: Option<u16>,
    pub response_ms: Option<u128>,
    pub condition: SiteCondition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One local file from the configuration.
#[derive(Debug, Clone, Serialize)]
pub struct LocalFileStatus {
    pub name: String,
    pub size_bytes: Option<u64>,
}

impl LocalFileStatus {
    #[must_use]
    pub fn present(&self) -> bool {
        self.size_bytes.is_some()
    }

    /// Size in megabytes, for display.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // display only
    pub fn size_mb(&self) -> Option<f64> {
        self.size_bytes.map(|b| b as f64 / (1024.0 * 1024.0))
    }
}

/// Everything `status` shows.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub checked_at: DateTime<Local>,
    pub site: EndpointStatus,
    pub db_setup: EndpointStatus,
    pub files: Vec<LocalFileStatus>,
    pub logs: Vec<LocalFileStatus>,
}

impl StatusReport {
    /// `true` when the site answers `200`.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.site.condition == SiteCondition::Live
    }
}

/// Probe the site and the database setup URL, and inventory local files.
pub async fn gather_status(
    probe: &impl HttpProbe,
    files: &impl FileInventory,
    config: &SiteConfig,
) -> StatusReport {
    let timeout = config.poll.policy().request_timeout;
    let site_url = config.site_url("");
    let db_url = config.site_url(&config.site.db_setup_path);

    let (site, db_setup) = tokio::join!(
        probe_endpoint(probe, &site_url, timeout),
        probe_endpoint(probe, &db_url, timeout),
    );

    StatusReport {
        checked_at: Local::now(),
        site,
        db_setup,
        files: inventory(files, Path::new(""), &config.site.required_files),
        logs: inventory(files, &config.output_dir, &config.site.log_files),
    }
}

/// GET one URL and classify the answer.
pub async fn probe_endpoint(
    probe: &impl HttpProbe,
    url: &str,
    timeout: std::time::Duration,
) -> EndpointStatus {
    match probe.get(url, timeout).await {
        Ok(result) => EndpointStatus {
            url: url.to_string(),
            status_code: Some(result.status_code),
            response_ms: Some(result.response_time.as_millis()),
            condition: SiteCondition::classify(Some(result.status_code)),
            error: None,
        },
        Err(e) => EndpointStatus {
            url: url.to_string(),
            status_code: None,
            response_ms: None,
            condition: SiteCondition::Deploying,
            error: Some(format!("{e:#}")),
        },
    }
}

/// Relative names resolve against `base`; an empty base means the working directory.
fn inventory(files: &impl FileInventory, base: &Path, names: &[String]) -> Vec<LocalFileStatus> {
    names
        .iter()
        .map(|name| LocalFileStatus {
            name: name.clone(),
            size_bytes: files.size_of(&base.join(name)),
        })
        .collect()
}
