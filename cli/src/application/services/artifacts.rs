//! Application service — local artifacts: guide, report, rendered `.env`.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};

use crate::application::ports::{ArtifactWriter, DeployLogStore};
use crate::domain::config::SiteConfig;
use crate::domain::templates::{EnvTemplate, quick_guide, render_env};

/// File name of the quick deployment guide.
pub const GUIDE_FILE: &str = "QUICK_DEPLOYMENT_GUIDE.md";

/// Timestamp format embedded in generated file names.
pub const FILE_TIMESTAMP: &str = "%Y%m%d_%H%M%S";

/// Write the quick deployment guide.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_guide(writer: &impl ArtifactWriter, config: &SiteConfig) -> Result<PathBuf> {
    writer.write(GUIDE_FILE, &quick_guide(config))
}

/// Name of the Markdown report generated at `at`.
#[must_use]
pub fn report_file_name(at: DateTime<Local>) -> String {
    format!("deployment_report_{}.md", at.format(FILE_TIMESTAMP))
}

/// Render the deploy log to a timestamped Markdown report.
///
/// # Errors
///
/// Returns an error if the log cannot be read or the report written.
pub async fn write_report(
    log: &impl DeployLogStore,
    writer: &impl ArtifactWriter,
    config: &SiteConfig,
    at: DateTime<Local>,
) -> Result<(PathBuf, usize)> {
    let entries = log.load().await?;
    let title = format!("{} Deployment Report", config.site.name);
    let markdown = entries.to_markdown(&title, at.with_timezone(&Utc));
    let path = writer.write(&report_file_name(at), &markdown)?;
    Ok((path, entries.entries().len()))
}

/// Render the `.env` file for `config`.
#[must_use]
pub fn render_env_file(config: &SiteConfig, db_password: Option<&str>) -> String {
    render_env(&EnvTemplate::from_config(config, db_password))
}
