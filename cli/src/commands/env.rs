//! `site-doctor env` — render configuration-derived files locally.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::services::artifacts::render_env_file;
use crate::infra::fs::write_atomic;

/// Env subcommands.
#[derive(Subcommand)]
pub enum EnvCommand {
    /// Render the production .env
    Render {
        /// Write to this file (mode 600) instead of stdout
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Run the env command.
///
/// # Errors
///
/// Returns an error if the configuration or password cannot be read, or the
/// file cannot be written.
pub fn run(app: &AppContext, cmd: EnvCommand) -> Result<ExitCode> {
    match cmd {
        EnvCommand::Render { output } => render(app, output),
    }
}

fn render(app: &AppContext, output: Option<PathBuf>) -> Result<ExitCode> {
    let config = app.load_config()?;
    let password = app.db_password(&config)?;
    let env = render_env_file(&config, password.as_deref());

    match output {
        Some(path) => {
            write_atomic(&path, env.as_bytes(), Some(0o600), true)?;
            if password.is_none() && !app.is_json() {
                app.output
                    .warn("No database password supplied; DB_PASSWORD is a placeholder");
            }
            app.renderer().render_path(".env written", &path)?;
        }
        None => app.renderer().render_env(&env, password.is_none())?,
    }
    Ok(ExitCode::SUCCESS)
}
