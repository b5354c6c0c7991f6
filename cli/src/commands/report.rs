//! `site-doctor report` — render the deploy log to Markdown.

use std::process::ExitCode;

use anyhow::Result;
use chrono::Local;

use crate::app::AppContext;
use crate::application::services::artifacts::write_report;

/// Write `deployment_report_<timestamp>.md` from the deploy log.
///
/// # Errors
///
/// Returns an error if the configuration or the deploy log cannot be read,
/// or the report cannot be written.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.load_config()?;
    let (path, entries) = write_report(
        &AppContext::deploy_log(&config),
        &AppContext::local_fs(&config),
        &config,
        Local::now(),
    )
    .await?;
    if entries == 0 && !app.is_json() {
        app.output.warn("Deploy log is empty; the report has no steps");
    }
    app.renderer().render_path("Report written", &path)?;
    Ok(ExitCode::SUCCESS)
}
