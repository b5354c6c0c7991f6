//! `site-doctor status` — one-shot dashboard.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::site_status::gather_status;
use crate::infra::http::ReqwestProbe;
use crate::output::progress;

/// Probe the site and the database setup URL and list local files.
///
/// Exits `1` when the site does not answer `200`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the HTTP
/// client cannot be built.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.load_config()?;
    let probe = ReqwestProbe::new()?;
    let files = AppContext::local_fs(&config);

    let pb = app
        .show_progress()
        .then(|| progress::spinner(&format!("Checking {}", config.site.url)));
    let report = gather_status(&probe, &files, &config).await;
    if let Some(pb) = &pb {
        progress::finish(pb);
    }

    app.renderer().render_status(&report)?;
    Ok(if report.is_live() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
