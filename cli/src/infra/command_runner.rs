//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` runs local programs (`ssh`, `sshpass`) with a hard
//! timeout. On timeout the child is killed explicitly rather than dropped.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Child;

use crate::application::ports::CommandRunner;

/// Default timeout when the caller does not pass one.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(120);

/// Production `CommandRunner` backed by `tokio::process`.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let child = spawn(program, args, false)?;
        wait_with_timeout(child, program, None, timeout).await
    }

    async fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
        timeout: Duration,
    ) -> Result<Output> {
        let child = spawn(program, args, true)?;
        wait_with_timeout(child, program, Some(input), timeout).await
    }
}

fn spawn(program: &str, args: &[&str], piped_stdin: bool) -> Result<Child> {
    let stdin = if piped_stdin {
        Stdio::piped()
    } else {
        Stdio::null()
    };
    tokio::process::Command::new(program)
        .args(args)
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))
}

/// Feed `input` (if any), collect stdout/stderr, and kill the child on timeout.
async fn wait_with_timeout(
    mut child: Child,
    program: &str,
    input: Option<&[u8]>,
    timeout: Duration,
) -> Result<Output> {
    let mut stdin_handle = child.stdin.take();
    let mut stdout_handle = child.stdout.take();
    let mut stderr_handle = child.stderr.take();

    let feed = async {
        if let (Some(stdin), Some(bytes)) = (stdin_handle.as_mut(), input) {
            let _ = stdin.write_all(bytes).await;
            let _ = stdin.shutdown().await;
        }
        // Dropping the handle closes the pipe so `cat > file` sees EOF.
        drop(stdin_handle.take());
    };

    tokio::select! {
        result = async {
            let ((), status, stdout, stderr) = tokio::join!(
                feed,
                child.wait(),
                read_all(stdout_handle.as_mut()),
                read_all(stderr_handle.as_mut()),
            );
            Ok(Output {
                status: status.with_context(|| format!("waiting for {program}"))?,
                stdout,
                stderr,
            })
        } => result,
        () = tokio::time::sleep(timeout) => {
            let _ = child.kill().await;
            anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
        }
    }
}

async fn read_all<R: AsyncReadExt + Unpin>(handle: Option<&mut R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}
