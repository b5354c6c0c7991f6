//! Infrastructure implementation of the `DeployLogStore` port.
//!
//! `JsonDeployLogStore` keeps the log as a JSON array and rewrites it
//! atomically (temp file + rename) on every append, off the async runtime.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::DeployLogStore;
use crate::domain::config::DEPLOY_LOG_FILE;
use crate::domain::deploy_log::{DeployLog, DeployLogEntry};
use crate::infra::fs::write_atomic;

/// Deploy log stored as `deployment_log.json` in the output directory.
pub struct JsonDeployLogStore {
    path: PathBuf,
}

impl JsonDeployLogStore {
    /// Store inside `output_dir`.
    #[must_use]
    pub fn in_dir(output_dir: &Path) -> Self {
        Self::with_path(output_dir.join(DEPLOY_LOG_FILE))
    }

    /// Store at an explicit path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load_sync(path: &Path) -> Result<DeployLog> {
    if !path.exists() {
        return Ok(DeployLog::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading deploy log {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(DeployLog::new());
    }
    serde_json::from_str(&content).with_context(|| format!("parsing deploy log {}", path.display()))
}

fn append_sync(path: &Path, entry: DeployLogEntry) -> Result<()> {
    let mut log = load_sync(path)?;
    log.append(entry);
    let content = serde_json::to_string_pretty(&log).context("serializing deploy log")?;
    write_atomic(path, content.as_bytes(), Some(0o600), true)
}

impl DeployLogStore for JsonDeployLogStore {
    async fn load(&self) -> Result<DeployLog> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_sync(&path))
            .await
            .context("deploy log load task panicked")?
    }

    async fn append(&self, entry: DeployLogEntry) -> Result<()> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || append_sync(&path, entry))
            .await
            .context("deploy log append task panicked")?
    }
}
