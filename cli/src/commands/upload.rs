//! `site-doctor upload` — push the local project to the host.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::RemoteShell;
use crate::application::services::upload::{UploadRequest, upload_project};
use crate::infra::archive::TarGzArchiver;

/// Arguments for the upload command.
#[derive(Args)]
pub struct UploadArgs {
    /// Local project directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Snapshot the remote project root to ~/backup_<timestamp>.tar.gz first
    #[arg(long)]
    pub backup: bool,

    /// Pack and list the selection without sending anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Pack the configured selection and unpack it into the project root.
///
/// Exits `1` when any step failed.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, no remote is
/// configured, the project cannot be packed, or the deploy log cannot be written.
pub async fn run(app: &AppContext, args: &UploadArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let shell = app.remote_shell(&config)?;
    let source = args.source.clone().unwrap_or_else(|| PathBuf::from("."));

    if !args.dry_run {
        let prompt = format!(
            "Unpack {} into {} on {}?",
            source.display(),
            config.site.project_root,
            shell.target()
        );
        if !app.confirm(&prompt, true)? {
            app.output.info("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let report = upload_project(
        &shell,
        &TarGzArchiver,
        &AppContext::deploy_log(&config),
        &app.reporter(),
        &config,
        UploadRequest {
            source: &source,
            backup: args.backup,
            dry_run: args.dry_run,
            stamp: &stamp,
        },
    )
    .await?;

    app.renderer().render_repair(&report)?;
    Ok(if report.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
