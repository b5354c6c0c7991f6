//! `site-doctor verify` — final verification of the deployed endpoints.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::verification::run_verification;
use crate::infra::http::ReqwestProbe;

/// GET each endpoint once; write the success certificate when verified.
///
/// Exits `1` when fewer than 75 % of the endpoints answer `200`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the
/// certificate or deploy log cannot be written.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.load_config()?;
    let probe = ReqwestProbe::new()?;
    let outcome = run_verification(
        &probe,
        &AppContext::local_fs(&config),
        &AppContext::deploy_log(&config),
        &app.reporter(),
        &config,
    )
    .await?;

    app.renderer().render_verification(&outcome)?;
    Ok(if outcome.report.verified {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
