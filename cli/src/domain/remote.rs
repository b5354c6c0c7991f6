//! Remote command outcome record and shell quoting helpers.
//!
//! Pure functions only: no I/O, no async.

use std::process::Output;

use serde::Serialize;

/// Exit code `ssh` reserves for its own connection and protocol errors.
pub const SSH_TRANSPORT_EXIT: i32 = 255;

/// Exit code recorded when the transport failed before the command could report one.
pub const TRANSPORT_FAILURE_EXIT: i32 = -1;

/// Outcome of one remote command.
///
/// Transport failures never escape the executor: they are folded into an
/// outcome with `exit_code == -1` and the message in `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteOutcome {
    /// Exit code of the remote command, or `-1` on transport failure.
    pub exit_code: i32,
    /// Captured stdout, decoded lossily.
    pub stdout: String,
    /// Captured stderr, decoded lossily.
    pub stderr: String,
    /// Transport error message, if the command could not run to completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RemoteOutcome {
    /// Build an outcome from the captured output of an `ssh` process.
    ///
    /// A missing exit code (killed by a signal) and ssh's own exit code 255
    /// are both treated as transport failures.
    #[must_use]
    pub fn from_ssh_output(output: &Output) -> Self {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        match output.status.code() {
            Some(SSH_TRANSPORT_EXIT) => {
                let message = match stderr.trim() {
                    "" => "ssh exited with status 255".to_string(),
                    msg => msg.to_string(),
                };
                Self {
                    exit_code: TRANSPORT_FAILURE_EXIT,
                    stdout,
                    stderr,
                    error: Some(message),
                }
            }
            Some(code) => Self {
                exit_code: code,
                stdout,
                stderr,
                error: None,
            },
            None => Self {
                exit_code: TRANSPORT_FAILURE_EXIT,
                stdout,
                stderr,
                error: Some("remote session terminated by signal".to_string()),
            },
        }
    }

    /// Build a transport-failure outcome.
    #[must_use]
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            exit_code: TRANSPORT_FAILURE_EXIT,
            stdout: String::new(),
            stderr: String::new(),
            error: Some(message.into()),
        }
    }

    /// `true` when the command ran and exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// `true` when the command never completed on the remote side.
    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Trimmed stdout, convenient for single-value probes.
    #[must_use]
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Human-readable failure summary: the transport error, else stderr, else stdout.
    #[must_use]
    pub fn failure_summary(&self) -> String {
        if let Some(err) = &self.error {
            return err.clone();
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if stdout.is_empty() {
            format!("exit code {}", self.exit_code)
        } else {
            stdout.to_string()
        }
    }
}

/// Quote `value` for a POSIX shell using single quotes.
///
/// Embedded single quotes become `'\''`.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

/// Prefix `command` with `cd <dir> &&`, quoting the directory.
#[must_use]
pub fn in_dir(dir: &str, command: &str) -> String {
    format!("cd {} && {command}", shell_quote(dir))
}

/// Join a project-relative path onto the project root.
#[must_use]
pub fn join_remote(root: &str, relative: &str) -> String {
    let root = root.trim_end_matches('/');
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        root.to_string()
    } else {
        format!("{root}/{relative}")
    }
}
