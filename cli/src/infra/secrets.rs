//! Reading secrets from files and the environment.
//!
//! Secrets are never taken from the configuration file itself.

use std::path::Path;

use anyhow::{Context, Result};

/// Read a secret file, trimming the trailing newline editors add.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_secret_file(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read secret file {}", path.display()))?;
    warn_if_world_readable(path);
    Ok(raw.trim_end_matches(['\n', '\r']).to_string())
}

/// Value of `var`, when set and non-empty.
#[must_use]
pub fn secret_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

#[cfg(unix)]
fn warn_if_world_readable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let Ok(meta) = std::fs::metadata(path) else {
        return;
    };
    if meta.permissions().mode() & 0o077 != 0 {
        tracing::warn!(path = %path.display(), "secret file is readable by group or others");
    }
}

#[cfg(not(unix))]
fn warn_if_world_readable(_path: &Path) {}
