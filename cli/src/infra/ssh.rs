//! `ssh`-backed implementation of the `RemoteShell` port.
//!
//! Each command is one `ssh` process. Host key checking uses
//! `accept-new`, so the first connection pins the key in `known_hosts`.
//! Password logins go through `sshpass -f`, which reads the password
//! from a file and keeps it off the command line.

use std::path::PathBuf;
use std::time::Duration;

use crate::application::ports::{CommandRunner, RemoteShell};
use crate::domain::config::RemoteConfig;
use crate::domain::remote::RemoteOutcome;
use crate::infra::fs::expand_home;

/// Remote shell that shells out to the system `ssh` client.
pub struct SshShell<R> {
    runner: R,
    host: String,
    port: u16,
    user: String,
    identity_file: Option<PathBuf>,
    password_file: Option<PathBuf>,
    connect_timeout: Duration,
}

impl<R: CommandRunner> SshShell<R> {
    /// Build a shell for `config`, running processes through `runner`.
    #[must_use]
    pub fn new(runner: R, config: &RemoteConfig) -> Self {
        Self {
            runner,
            host: config.host.clone(),
            port: config.port,
            user: config.user.clone(),
            identity_file: config.identity_file.as_deref().map(expand_home),
            password_file: config.password_file.as_deref().map(expand_home),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs.max(1)),
        }
    }

    /// Program and arguments for running `command` remotely.
    #[must_use]
    pub fn invocation(&self, command: &str) -> (String, Vec<String>) {
        let mut args = Vec::new();
        let program = match &self.password_file {
            Some(file) => {
                args.extend([
                    "-f".to_string(),
                    file.display().to_string(),
                    "ssh".to_string(),
                ]);
                "sshpass".to_string()
            }
            None => "ssh".to_string(),
        };
        args.extend(["-p".to_string(), self.port.to_string()]);
        if self.password_file.is_none() {
            args.extend(["-o".to_string(), "BatchMode=yes".to_string()]);
        }
        args.extend([
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs()),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
        ]);
        if let Some(key) = &self.identity_file {
            args.extend(["-i".to_string(), key.display().to_string()]);
        }
        args.push(format!("{}@{}", self.user, self.host));
        args.push("--".to_string());
        args.push(command.to_string());
        (program, args)
    }

    fn outcome(result: anyhow::Result<std::process::Output>) -> RemoteOutcome {
        match result {
            Ok(output) => RemoteOutcome::from_ssh_output(&output),
            Err(e) => RemoteOutcome::transport_failure(format!("{e:#}")),
        }
    }
}

impl<R: CommandRunner> RemoteShell for SshShell<R> {
    fn target(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.port)
    }

    async fn exec(&self, command: &str, timeout: Duration) -> RemoteOutcome {
        let (program, args) = self.invocation(command);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Self::outcome(self.runner.run_with_timeout(&program, &args, timeout).await)
    }

    async fn exec_with_stdin(
        &self,
        command: &str,
        input: &[u8],
        timeout: Duration,
    ) -> RemoteOutcome {
        let (program, args) = self.invocation(command);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Self::outcome(
            self.runner
                .run_with_stdin(&program, &args, input, timeout)
                .await,
        )
    }
}
