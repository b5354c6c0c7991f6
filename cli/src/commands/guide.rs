//! `site-doctor guide` — write the quick deployment guide.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::artifacts::write_guide;

/// Write `QUICK_DEPLOYMENT_GUIDE.md` into the output directory.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the file written.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.load_config()?;
    let path = write_guide(&AppContext::local_fs(&config), &config)?;
    app.renderer().render_path("Guide written", &path)?;
    Ok(ExitCode::SUCCESS)
}
