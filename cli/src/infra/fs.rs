//! Filesystem infrastructure — implements `ArtifactWriter` and `FileInventory`.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{ArtifactWriter, FileInventory};

/// Local filesystem rooted at the configured output directory.
pub struct LocalFs {
    output_dir: PathBuf,
}

impl LocalFs {
    /// An empty `output_dir` means the working directory.
    #[must_use]
    pub fn new(output_dir: &Path) -> Self {
        let output_dir = if output_dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            output_dir.to_path_buf()
        };
        Self { output_dir }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ArtifactWriter for LocalFs {
    fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(name);
        write_atomic(&path, contents.as_bytes(), None, true)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "artifact written");
        Ok(path)
    }
}

impl FileInventory for LocalFs {
    fn size_of(&self, path: &Path) -> Option<u64> {
        std::fs::metadata(path)
            .ok()
            .filter(std::fs::Metadata::is_file)
            .map(|m| m.len())
    }
}

/// Expand a leading `~/` against the home directory.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Write `contents` to `path` through a temp file in the same directory, then rename.
///
/// With `overwrite == false` the rename fails if `path` already exists.
/// `mode` sets Unix permissions on the temp file before it is renamed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the temp file
/// cannot be written, or the final rename fails.
pub fn write_atomic(path: &Path, contents: &[u8], mode: Option<u32>, overwrite: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    temp.write_all(contents)
        .with_context(|| format!("writing temp file for {}", path.display()))?;
    temp.as_file()
        .sync_all()
        .with_context(|| format!("syncing temp file for {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Some(mode) = mode {
            std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(mode))
                .with_context(|| format!("setting permissions on {}", temp.path().display()))?;
        }
    }
    #[cfg(not(unix))]
    let _ = mode;

    let persisted = if overwrite {
        temp.persist(path).map(drop)
    } else {
        temp.persist_noclobber(path).map(drop)
    };
    persisted.map_err(|e| e.error).with_context(|| format!("writing {}", path.display()))
}
