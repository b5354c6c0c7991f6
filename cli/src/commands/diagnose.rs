//! `site-doctor diagnose` — remote and HTTP diagnostics.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::site_diagnose::run_diagnosis;
use crate::domain::health::collect_issues;
use crate::infra::http::ReqwestProbe;
use crate::infra::network::SystemResolver;

/// Run all checks and print the hints for every failed one.
///
/// Exits `1` when any issue is found.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or no remote is
/// configured. Unreachable hosts are reported as failed checks.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.load_config()?;
    let shell = app.remote_shell(&config)?;
    let probe = ReqwestProbe::new()?;

    let report = run_diagnosis(&shell, &probe, &SystemResolver, &app.reporter(), &config).await;
    let issues = collect_issues(&report);

    app.renderer().render_diagnosis(&report, &issues)?;
    Ok(if issues.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
