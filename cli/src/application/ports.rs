//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::config::SiteConfig;
use crate::domain::deploy_log::{DeployLog, DeployLogEntry};
use crate::domain::probe::ProbeResult;
use crate::domain::remote::RemoteOutcome;
use crate::domain::upload::{PackedArchive, UploadConfig};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `input`.
    ///
    /// # Errors
    ///
    /// Same as [`CommandRunner::run_with_timeout`].
    async fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Remote Shell Port ─────────────────────────────────────────────────────────

/// A shell on the hosting account.
///
/// Implementations never fail: transport problems come back as a
/// [`RemoteOutcome`] with `exit_code == -1` and `error` set.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    /// `user@host:port`, for display and logging.
    fn target(&self) -> String;
    /// Run `command` through the remote login shell.
    async fn exec(&self, command: &str, timeout: Duration) -> RemoteOutcome;
    /// Run `command` with `input` on its stdin.
    async fn exec_with_stdin(&self, command: &str, input: &[u8], timeout: Duration)
    -> RemoteOutcome;
}

// ── HTTP / Network Ports ──────────────────────────────────────────────────────

/// One HTTP GET, used by the poller, `status`, `verify` and `diagnose`.
#[allow(async_fn_in_trait)]
pub trait HttpProbe {
    /// Issue a GET and return status, timing and a body snippet.
    ///
    /// # Errors
    ///
    /// Returns an error when no response arrives (DNS, connect, TLS, timeout).
    async fn get(&self, url: &str, timeout: Duration) -> Result<ProbeResult>;
}

/// Abstracts network checks so services can be tested without real DNS.
#[allow(async_fn_in_trait)]
pub trait NetworkProbe {
    /// Check DNS resolution for the given hostname.
    async fn check_dns_resolution(&self, hostname: &str) -> Result<bool>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── State and Filesystem Ports ────────────────────────────────────────────────

/// Append-only persistence of the deploy log.
#[allow(async_fn_in_trait)]
pub trait DeployLogStore {
    /// Load the log, or an empty one if none was written yet.
    async fn load(&self) -> Result<DeployLog>;
    /// Append one entry and persist the whole log.
    async fn append(&self, entry: DeployLogEntry) -> Result<()>;
}

/// Writes generated artifacts into the output directory.
pub trait ArtifactWriter {
    /// Write `contents` to `name` inside the output directory and return the full path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file written.
    fn write(&self, name: &str, contents: &str) -> Result<PathBuf>;
}

/// Read-only view of local files listed in the configuration.
pub trait FileInventory {
    /// Size in bytes of `path`, or `None` when it does not exist.
    fn size_of(&self, path: &Path) -> Option<u64>;
}

/// Packs the selected part of a local project into a gzip tarball.
pub trait ProjectArchiver {
    /// Walk `source`, apply `selection`, and pack what remains.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is not a directory or a file cannot be read.
    fn pack(&self, source: &Path, selection: &UploadConfig) -> Result<PackedArchive>;
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Where the configuration lives and how it is read.
pub trait ConfigStore {
    /// Load and parse the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no file is found or it cannot be parsed.
    fn load(&self) -> Result<SiteConfig>;
    /// The resolved configuration path (which may not exist yet).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
    /// Write the starter template with owner-only permissions.
    ///
    /// # Errors
    ///
    /// Returns an error if the file already exists or cannot be written.
    fn write_template(&self) -> Result<PathBuf>;
}
