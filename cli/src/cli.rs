//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Diagnose, monitor and repair a Laravel deployment on shared hosting
#[derive(Parser)]
#[command(
    name = "site-doctor",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Configuration file
    #[arg(long, global = true, env = "SITE_DOCTOR_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Answer prompts with their defaults
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show site, database setup and local file status
    Status,

    /// Print the important URLs
    Links,

    /// Write the quick deployment guide
    Guide,

    /// Poll the site until it answers 200
    Monitor(commands::monitor::MonitorArgs),

    /// Verify the deployed endpoints
    Verify,

    /// Run one command on the remote host
    Exec(commands::exec::ExecArgs),

    /// Diagnose 403/500 problems
    Diagnose,

    /// Run a repair procedure
    #[command(subcommand)]
    Repair(commands::repair::RepairCommand),

    /// Upload the local project to the host
    Upload(commands::upload::UploadArgs),

    /// Render configuration-derived files
    #[command(subcommand)]
    Env(commands::env::EnvCommand),

    /// Render the deploy log to a Markdown report
    Report,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            yes,
            command,
        } = self;

        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes, config },
        });

        match command {
            Command::Status => commands::status::run(&app).await,
            Command::Links => commands::links::run(&app),
            Command::Guide => commands::guide::run(&app),
            Command::Monitor(args) => commands::monitor::run(&app, &args).await,
            Command::Verify => commands::verify::run(&app).await,
            Command::Exec(args) => commands::exec::run(&app, &args).await,
            Command::Diagnose => commands::diagnose::run(&app).await,
            Command::Repair(cmd) => commands::repair::run(&app, cmd).await,
            Command::Upload(args) => commands::upload::run(&app, &args).await,
            Command::Env(cmd) => commands::env::run(&app, cmd),
            Command::Report => commands::report::run(&app).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
