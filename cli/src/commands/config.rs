//! `site-doctor config` — inspect or scaffold the configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration (secret files by path only)
    Show,
    /// Print the resolved configuration path
    Path,
    /// Write a starter configuration (mode 600)
    Init,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be found, parsed or written.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Path => {
            let path = app.config_store.path()?;
            app.renderer().render_path("Configuration", &path)?;
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommand::Init => {
            let path = config_service::init_config(&app.config_store)?;
            app.renderer().render_path("Configuration written", &path)?;
            if !app.is_json() {
                app.output
                    .info("Edit site.url, site.project_root and the remote section before use");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;
    app.renderer().render_config(&config, &path)?;
    Ok(ExitCode::SUCCESS)
}
