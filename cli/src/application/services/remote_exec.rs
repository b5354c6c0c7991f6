//! Application service — remote command execution and file pushes.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use anyhow::Result;

use crate::application::ports::RemoteShell;
use crate::domain::remote::RemoteOutcome;
use crate::domain::templates::{heredoc_command, stdin_write_command, tar_extract_command};

/// Timeout for ordinary remote commands.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for slow steps such as migrations and cache rebuilds.
pub const LONG_REMOTE_TIMEOUT: Duration = Duration::from_secs(600);

/// Run `command` on the remote shell.
///
/// Never fails: transport problems are reported inside the outcome.
pub async fn execute(
    shell: &impl RemoteShell,
    command: &str,
    timeout: Option<Duration>,
) -> RemoteOutcome {
    let timeout = timeout.unwrap_or(DEFAULT_REMOTE_TIMEOUT);
    tracing::debug!(target = %shell.target(), %command, timeout_secs = timeout.as_secs(), "remote exec");
    let outcome = shell.exec(command, timeout).await;
    log_outcome(&outcome);
    outcome
}

/// Stream `contents` into `path` over stdin, optionally `chmod`ing it afterwards.
///
/// The contents never appear on a command line.
///
/// # Errors
///
/// Returns an error if `path` is not a usable remote path.
pub async fn push_file(
    shell: &impl RemoteShell,
    path: &str,
    contents: &[u8],
    mode: Option<&str>,
) -> Result<RemoteOutcome> {
    let command = stdin_write_command(path, mode)?;
    tracing::debug!(target = %shell.target(), %path, bytes = contents.len(), "remote push");
    let outcome = shell
        .exec_with_stdin(&command, contents, DEFAULT_REMOTE_TIMEOUT)
        .await;
    log_outcome(&outcome);
    Ok(outcome)
}

/// Stream a gzip tarball over stdin and unpack it into `root`.
///
/// # Errors
///
/// Returns an error if `root` is not a usable remote path.
pub async fn push_archive(
    shell: &impl RemoteShell,
    root: &str,
    archive: &[u8],
) -> Result<RemoteOutcome> {
    let command = tar_extract_command(root)?;
    tracing::debug!(target = %shell.target(), %root, bytes = archive.len(), "remote archive push");
    let outcome = shell
        .exec_with_stdin(&command, archive, LONG_REMOTE_TIMEOUT)
        .await;
    log_outcome(&outcome);
    Ok(outcome)
}

/// Write a non-secret text file through a quoted here-document.
///
/// # Errors
///
/// Returns an error if `path` is not a usable remote path or no delimiter fits.
pub async fn write_heredoc(
    shell: &impl RemoteShell,
    path: &str,
    body: &str,
) -> Result<RemoteOutcome> {
    let command = heredoc_command(path, body)?;
    tracing::debug!(target = %shell.target(), %path, "remote heredoc write");
    let outcome = shell.exec(&command, DEFAULT_REMOTE_TIMEOUT).await;
    log_outcome(&outcome);
    Ok(outcome)
}

fn log_outcome(outcome: &RemoteOutcome) {
    if outcome.is_transport_failure() {
        tracing::warn!(error = outcome.error.as_deref().unwrap_or(""), "remote transport failure");
    } else {
        tracing::debug!(exit_code = outcome.exit_code, "remote command finished");
    }
}
