//! `site-doctor exec` — run one command on the remote host.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::remote_exec::execute;
use crate::output::progress;

/// Arguments for the exec command.
#[derive(Args)]
#[command(trailing_var_arg = true)]
pub struct ExecArgs {
    /// Timeout in seconds (default 120)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Command and arguments, passed to the remote login shell as one line
    #[arg(required = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run a command through the remote executor.
///
/// Exits `1` when the command fails or the connection does.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or no remote is configured.
pub async fn run(app: &AppContext, args: &ExecArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let shell = app.remote_shell(&config)?;
    let command = args.command.join(" ");

    let pb = app
        .show_progress()
        .then(|| progress::spinner(&format!("Running on {}", config.remote.display_target())));
    let outcome = execute(&shell, &command, args.timeout.map(Duration::from_secs)).await;
    if let Some(pb) = &pb {
        progress::finish(pb);
    }

    app.renderer().render_exec(&command, &outcome)?;
    Ok(if outcome.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
