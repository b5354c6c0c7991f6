//! site-doctor - diagnose and repair a shared-hosting Laravel deployment

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use site_doctor::cli::Cli;
use site_doctor::domain::error::{ConfigError, RemoteError};
use site_doctor::output::json::format_error;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json {
                match format_error(&format!("{e:#}"), error_code(&e)) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr, filtered by `SITE_DOCTOR_LOG`, else `RUST_LOG`, else `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("SITE_DOCTOR_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn error_code(e: &anyhow::Error) -> &'static str {
    match e.downcast_ref::<ConfigError>() {
        Some(ConfigError::NotFound) => return "CONFIG_NOT_FOUND",
        Some(ConfigError::AlreadyExists(_)) => return "CONFIG_EXISTS",
        Some(_) => return "CONFIG_INVALID",
        None => {}
    }
    match e.downcast_ref::<RemoteError>() {
        Some(RemoteError::NotConfigured) => "REMOTE_NOT_CONFIGURED",
        None => "ERROR",
    }
}
