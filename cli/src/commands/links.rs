//! `site-doctor links` — print the important URLs.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Print the site, database setup, admin and hosting panel URLs.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.load_config()?;
    app.renderer().render_links(&config.links())?;
    Ok(ExitCode::SUCCESS)
}
