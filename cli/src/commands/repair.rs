//! `site-doctor repair` — repair procedures for the 403 and 500 cases.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::RemoteShell;
use crate::application::services::site_repair::{
    RepairReport, repair_app, repair_env, repair_routing,
};
use crate::infra::http::ReqwestProbe;

/// Repair subcommands.
#[derive(Subcommand)]
pub enum RepairCommand {
    /// Fix 403 Forbidden: rewrite rules, permissions, PHP execution
    Routing,
    /// Fix 500 errors: caches, application key, storage permissions
    App,
    /// Push a fresh .env and migrate the database
    Env,
}

/// Run a repair procedure.
///
/// Exits `1` when any step failed.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, no remote is
/// configured, or the deploy log cannot be written.
pub async fn run(app: &AppContext, cmd: RepairCommand) -> Result<ExitCode> {
    let config = app.load_config()?;
    let shell = app.remote_shell(&config)?;
    let log = AppContext::deploy_log(&config);
    let reporter = app.reporter();

    let report = match cmd {
        RepairCommand::Routing => {
            let probe = ReqwestProbe::new()?;
            repair_routing(&shell, &probe, &log, &reporter, &config).await?
        }
        RepairCommand::App => {
            let probe = ReqwestProbe::new()?;
            repair_app(&shell, &probe, &log, &reporter, &config).await?
        }
        RepairCommand::Env => {
            let prompt = format!("Replace .env on {}?", shell.target());
            if !app.confirm(&prompt, true)? {
                app.output.info("Cancelled.");
                return Ok(ExitCode::SUCCESS);
            }
            let password = app.db_password(&config)?;
            repair_env(&shell, &log, &reporter, &config, password.as_deref()).await?
        }
    };

    render(app, &report)
}

fn render(app: &AppContext, report: &RepairReport) -> Result<ExitCode> {
    app.renderer().render_repair(report)?;
    Ok(if report.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
